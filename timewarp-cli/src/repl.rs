use std::io::BufRead;
use std::rc::Rc;

use timewarp::{eval_line, Env};

/// What a session got through.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub evaluated: usize,
    pub failed: usize,
}

/// One expression per line. Results are not echoed; a failing line is
/// reported and the loop moves on.
pub fn run(input: impl BufRead, env: &Rc<Env>) -> std::io::Result<Summary> {
    let mut summary = Summary::default();
    for line in input.lines() {
        let line = line?;
        match eval_line(&line, env) {
            Ok(Some(_)) => summary.evaluated += 1,
            Ok(None) => {}
            Err(err) => {
                summary.failed += 1;
                log::error!("{}", err);
            }
        }
    }
    Ok(summary)
}
