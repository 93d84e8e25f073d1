use super::mask::MaskImage;
use crate::error::{GlobeError, Result};
use crate::types::Viewpoint;
use std::path::PathBuf;

/// Positive and negative mask for one viewpoint.
#[derive(Debug, Clone)]
pub struct TargetView {
    pub positive: MaskImage,
    pub negative: MaskImage,
    pub viewpoint: Viewpoint,
}

impl TargetView {
    /// The negative mask is the inversion of `positive`.
    pub fn new(positive: MaskImage, viewpoint: Viewpoint) -> Self {
        let negative = positive.inverted();
        Self { positive, negative, viewpoint }
    }
}

/// Ordered, immutable list of views one fitness evaluation renders.
#[derive(Debug, Clone)]
pub struct TargetSet {
    views: Vec<TargetView>,
}

impl TargetSet {
    pub fn new(views: Vec<TargetView>) -> Result<Self> {
        if views.is_empty() {
            return Err(GlobeError::Configuration("Target set has no views".to_string()));
        }
        Ok(Self { views })
    }

    /// Load one positive mask per path; the i-th mask targets hour i.
    ///
    /// Every path is checked before any image is decoded so the first
    /// missing file is reported by name.
    pub fn load(paths: &[PathBuf]) -> Result<Self> {
        if let Some(missing) = paths.iter().find(|path| !path.is_file()) {
            return Err(GlobeError::MissingMask { path: missing.clone() });
        }
        let views = paths
            .iter()
            .enumerate()
            .map(|(hour, path)| -> Result<TargetView> {
                Ok(TargetView::new(MaskImage::open(path)?, Viewpoint::Hour(hour as u32)))
            })
            .collect::<Result<Vec<_>>>()?;
        log::info!("Loaded {} target masks", views.len());
        Self::new(views)
    }

    pub fn views(&self) -> &[TargetView] {
        &self.views
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }
}
