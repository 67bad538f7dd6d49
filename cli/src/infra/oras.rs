//! The registry client capability, backed by the `oras` CLI.

use std::path::Path;

use anyhow::Result;

use crate::application::ports::{CommandRunner, RegistryClient};
use crate::infra::command_runner::check_success;
use crate::infra::host::LocalHost;

impl<R: CommandRunner> RegistryClient for LocalHost<R> {
    async fn pull(&self, client: &Path, reference: &str, dest: &Path) -> Result<()> {
        let dest = dest.to_string_lossy();
        let output = self
            .runner
            .run(client, &["pull", reference, "--output", &dest])
            .await?;
        check_success(&output, "oras pull")
    }
}
