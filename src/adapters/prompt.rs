use crate::domain::ports::Prompt;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Stdin};
use tokio::sync::Mutex;

/// Y/N prompt reading answers line by line. Re-asks until it gets Y or N;
/// end of input counts as N.
pub struct LinePrompt<R> {
    reader: Mutex<R>,
}

impl LinePrompt<BufReader<Stdin>> {
    pub fn stdin() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()))
    }
}

impl<R> LinePrompt<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader: Mutex::new(reader),
        }
    }
}

#[async_trait]
impl<R> Prompt for LinePrompt<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    async fn confirm(&self, question: &str) -> Result<bool> {
        let mut reader = self.reader.lock().await;

        loop {
            print!("{} (Y/N) ", question);
            std::io::stdout().flush()?;

            let mut line = String::new();
            if reader.read_line(&mut line).await? == 0 {
                println!();
                tracing::debug!("Prompt input closed, treating as 'N'");
                return Ok(false);
            }

            match line.trim().to_uppercase().as_str() {
                "Y" => return Ok(true),
                "N" => return Ok(false),
                other => tracing::debug!("Ignoring prompt answer '{}'", other),
            }
        }
    }
}
