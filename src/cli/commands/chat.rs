use anyhow::Result;

use crate::chat::ChatSession;
use crate::config::ResolveOptions;

/// Starts the interactive chat. Configuration problems fail before any prompt is shown.
pub async fn run_chat(options: ResolveOptions) -> Result<()> {
    let resolved = super::load_resolved(&options)?;
    let mut session = ChatSession::new(&resolved);
    session.run().await
}
