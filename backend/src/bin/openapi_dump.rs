//! Print the OpenAPI document as JSON.

use std::io::{self, Write};

use color_eyre::eyre::{Result, WrapErr};
use network_backend::doc::ApiDoc;
use utoipa::OpenApi;

fn main() -> Result<()> {
    color_eyre::install()?;
    let json = ApiDoc::openapi()
        .to_pretty_json()
        .wrap_err("serialise OpenAPI document")?;
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{json}").wrap_err("write OpenAPI document")?;
    Ok(())
}
