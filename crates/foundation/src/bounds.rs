/// Geographic bounding box in degrees, positioning a flat overlay image.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Extent {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl Extent {
    pub const fn new(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Self {
        Self {
            min_lon,
            min_lat,
            max_lon,
            max_lat,
        }
    }

    /// `[min_lon, min_lat, max_lon, max_lat]`, the order mapping engines use.
    pub fn from_array(a: [f64; 4]) -> Self {
        Self::new(a[0], a[1], a[2], a[3])
    }

    pub fn as_array(self) -> [f64; 4] {
        [self.min_lon, self.min_lat, self.max_lon, self.max_lat]
    }

    pub fn width(self) -> f64 {
        self.max_lon - self.min_lon
    }

    pub fn height(self) -> f64 {
        self.max_lat - self.min_lat
    }

    /// Finite with strictly positive width and height.
    pub fn is_valid(self) -> bool {
        self.as_array().iter().all(|v| v.is_finite()) && self.width() > 0.0 && self.height() > 0.0
    }

    pub fn shifted_lon(self, offset_deg: f64) -> Self {
        Self::new(
            self.min_lon + offset_deg,
            self.min_lat,
            self.max_lon + offset_deg,
            self.max_lat,
        )
    }

    pub fn contains(self, lon: f64, lat: f64) -> bool {
        lon >= self.min_lon && lon <= self.max_lon && lat >= self.min_lat && lat <= self.max_lat
    }

    /// Copies of this extent shifted by whole image widths, so panning across
    /// the antimeridian shows continuous imagery.
    ///
    /// Yields `(index, extent)` for `index` in `-repeats..=repeats`, ascending.
    pub fn world_wrapped(self, repeats: u32) -> impl Iterator<Item = (i32, Extent)> {
        let width = self.width();
        let n = repeats as i32;
        (-n..=n).map(move |i| (i, self.shifted_lon(f64::from(i) * width)))
    }
}
