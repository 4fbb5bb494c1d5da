pub mod batch;
pub mod calibration;
pub mod palette_store;
pub mod render;

pub use batch::{collect_inputs, BatchReport, BatchService};
pub use calibration::CalibrationService;
pub use render::{RenderReport, RenderService, RenderTargets};
