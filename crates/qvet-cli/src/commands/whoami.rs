//! Authenticated user

use crate::app::App;
use crate::output::{self, OutputFormat};
use anyhow::Result;

pub async fn execute(app: &App) -> Result<()> {
    let user = app.actor().await?;
    match app.output {
        OutputFormat::Table => {
            println!("{} (id {})", user.login, user.id);
            Ok(())
        }
        format => output::print_single(&user, format),
    }
}
