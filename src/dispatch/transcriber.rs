use std::io::Write;

use crate::dispatch::Dispatch;

/// Writes dispatches as lines of a VeriPB-style proof.
///
/// - `f id : constraint` for input.
/// - `p id : derivation` with the derived constraint as a comment.
/// - `u constraint ;` for a constraint derived without a recorded derivation, e.g. by probing, to be checked by unit propagation.
/// - `del id` for deletions.
/// - `sol literals` for solutions.
/// - `c id` for a contradiction.
pub struct ProofTranscriber<W: Write> {
    out: W,
}

impl<W: Write> ProofTranscriber<W> {
    pub fn new(out: W) -> Self {
        ProofTranscriber { out }
    }

    /// Transcribes a dispatch.
    pub fn transcribe(&mut self, dispatch: &Dispatch) -> Result<(), std::io::Error> {
        match dispatch {
            Dispatch::Input { id, constraint } => writeln!(self.out, "f {id} : {constraint} ;"),

            Dispatch::Derived {
                id,
                derivation,
                constraint,
            } => match derivation.is_empty() {
                true => writeln!(self.out, "u {constraint} ; % {id}"),
                false => writeln!(self.out, "p {id} : {derivation} % {constraint}"),
            },

            Dispatch::Deleted { id } => writeln!(self.out, "del id {id}"),

            Dispatch::Solution { literals } => {
                write!(self.out, "sol")?;
                for literal in literals {
                    match *literal < 0 {
                        true => write!(self.out, " ~x{}", -literal)?,
                        false => write!(self.out, " x{literal}")?,
                    }
                }
                writeln!(self.out)
            }

            Dispatch::ObjectiveBound { lower, upper } => match upper {
                Some(upper) => writeln!(self.out, "* bounds {lower} {upper}"),
                None => writeln!(self.out, "* bounds {lower} inf"),
            },

            Dispatch::Contradiction { id } => writeln!(self.out, "c {id}"),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
