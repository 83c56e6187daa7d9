/// Observer for the progress of a run
pub mod observer;
/// Launching of external processes
pub mod process;
/// Sequential execution of the pipeline stages
pub mod runner;
