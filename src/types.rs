use std::fmt;

/// The point in an invocation's pipe handling where an I/O error occurred.
///
/// - `Stdin`: writing the payload to, or closing, the child's input.
/// - `Stdout` / `Stderr`: draining the corresponding output stream.
/// - `Wait`: reaping the child after all streams finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipeStage {
    Stdin,
    Stdout,
    Stderr,
    Wait,
}

impl fmt::Display for PipeStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PipeStage::Stdin => "stdin",
            PipeStage::Stdout => "stdout",
            PipeStage::Stderr => "stderr",
            PipeStage::Wait => "wait",
        };
        f.write_str(s)
    }
}
