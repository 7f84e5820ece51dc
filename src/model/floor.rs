/// One building floor as supplied by the upstream floor lookup.
#[derive(Clone, Debug, PartialEq)]
pub struct FloorPlan {
    /// Upstream floor identifier.
    pub id: String,
    /// Human-readable floor name.
    pub name: String,
    /// Encoded background image (PNG, JPEG, ...), `None` when the export has no image.
    pub image: Option<Vec<u8>>,
    /// Declared image width in pixels, `0` when undeclared. The decoded image width is what
    /// gets rendered; a differing declaration only triggers a warning.
    pub pixel_width: u32,
    /// Declared image height in pixels, `0` when undeclared.
    pub pixel_height: u32,
    /// Real-world width of the plan (survey units, e.g. meters).
    pub real_width: f64,
    /// Real-world height of the plan, same unit as `real_width`.
    pub real_height: f64,
}

impl FloorPlan {
    /// Whether a nonzero declared size disagrees with the decoded `width` x `height`.
    pub fn declared_size_differs(&self, width: u32, height: u32) -> bool {
        (self.pixel_width != 0 && self.pixel_width != width)
            || (self.pixel_height != 0 && self.pixel_height != height)
    }

    /// Metadata copy sized to the decoded background, without the encoded image bytes.
    pub fn sized_to(&self, width: u32, height: u32) -> Self {
        Self {
            id: self.id.clone(),
            name: self.name.clone(),
            image: None,
            pixel_width: width,
            pixel_height: height,
            real_width: self.real_width,
            real_height: self.real_height,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/floor.rs"]
mod tests;
