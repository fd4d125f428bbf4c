/// A face bounding box in frame pixel coordinates.
///
/// Purely geometric: a region carries no identity. Every region found in a
/// frame is annotated with the same current label.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Region {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Region {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn center_x(&self) -> i32 {
        self.x + self.width / 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Region::new(0, 0, 10, 10), 5)]
    #[case(Region::new(100, 40, 51, 60), 125)]
    #[case(Region::new(-20, 0, 40, 40), 0)]
    fn test_center_x(#[case] region: Region, #[case] expected: i32) {
        assert_eq!(region.center_x(), expected);
    }
}
