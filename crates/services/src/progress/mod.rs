mod tracker;

pub use tracker::ProgressTracker;
