use foundation::math::GeoCoordinate;

/// Display sink for picked coordinates.
///
/// Every pick result is pushed here; a miss clears the shown value so the
/// readout never keeps a stale coordinate.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CoordinateReadout {
    current: Option<GeoCoordinate>,
}

impl CoordinateReadout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the displayed value changed.
    pub fn update(&mut self, pick: Option<GeoCoordinate>) -> bool {
        if self.current == pick {
            return false;
        }
        self.current = pick;
        true
    }

    pub fn current(&self) -> Option<GeoCoordinate> {
        self.current
    }

    pub fn lines(&self) -> [String; 2] {
        match self.current {
            Some(c) => [
                format!("Latitude: {:.2}°", c.latitude),
                format!("Longitude: {:.2}°", c.longitude),
            ],
            None => ["Latitude: --".to_string(), "Longitude: --".to_string()],
        }
    }
}
