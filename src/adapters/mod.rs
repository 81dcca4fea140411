// Adapters layer: report rendering and file output.

pub mod report;
pub mod storage;
