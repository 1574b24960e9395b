//! Dynamic library command handler.

use std::io::Write;

use utilkit_os::SharedLibrary;

use crate::error::CliError;

/// Load `path` and print one `symbol<TAB>address` line per symbol.
///
/// Stops at the first symbol that cannot be resolved.
pub fn resolve(out: &mut impl Write, path: &str, symbols: &[String]) -> Result<(), CliError> {
    let mut library = SharedLibrary::load(path)?;
    for symbol in symbols {
        let address = library.resolve(symbol)?;
        writeln!(out, "{symbol}\t{address}")?;
    }
    library.unload()?;
    Ok(())
}
