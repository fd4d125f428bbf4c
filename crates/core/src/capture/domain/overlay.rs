use crate::recognition::domain::identity_label::IdentityLabel;
use crate::shared::region::Region;

/// Gap between the label baseline and the top edge of its box.
pub const LABEL_BASELINE_GAP: i32 = 2;

/// A detected face box together with the text drawn over it.
#[derive(Clone, Debug, PartialEq)]
pub struct Overlay {
    pub region: Region,
    pub label: IdentityLabel,
}

impl Overlay {
    pub fn new(region: Region, label: IdentityLabel) -> Self {
        Self { region, label }
    }

    /// Annotates every region with the same label.
    pub fn for_regions(regions: &[Region], label: &IdentityLabel) -> Vec<Overlay> {
        regions
            .iter()
            .map(|r| Overlay::new(*r, label.clone()))
            .collect()
    }

    /// Text origin (left, baseline) for a label `text_width` pixels wide:
    /// centred over the box, just above its top edge, never left of the frame.
    pub fn label_origin(&self, text_width: i32) -> (i32, i32) {
        let x = (self.region.center_x() - text_width / 2).max(0);
        let y = self.region.y - LABEL_BASELINE_GAP;
        (x, y)
    }
}
