//! Print the OpenAPI document as JSON.

use utoipa::OpenApi;
use votecerto::doc::ApiDoc;

#[expect(clippy::print_stdout, reason = "the document is the program's output")]
fn main() -> std::io::Result<()> {
    let json = ApiDoc::openapi()
        .to_pretty_json()
        .map_err(std::io::Error::other)?;
    println!("{json}");
    Ok(())
}
