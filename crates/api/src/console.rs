//! Terminal front end: mode menu, interactive session, and quick demo.
//!
//! The console is generic over an async line reader and writer so the same
//! code runs against stdin/stdout and against in-memory buffers in tests.
//! End of input always ends the current loop.

use std::io;

use grokgen_core::generation::{clamp_count, GenerateOptions, ResponseFormat};
use grokgen_core::generator::ImageGenerator;
use grokgen_core::session::SessionLog;
use grokgen_core::types::GenerationResult;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

/// Prompts offered by the quick demo.
pub static EXAMPLE_PROMPTS: [&str; 8] = [
    "A majestic dragon flying over a medieval castle at sunset",
    "A futuristic city with flying cars and neon lights",
    "A cute robot cat sitting in a flower garden",
    "A magical forest with glowing mushrooms and fairy lights",
    "A space station orbiting a colorful nebula",
    "A steampunk airship floating above the clouds",
    "A cozy coffee shop on a rainy day with warm lighting",
    "A cyberpunk street market with holographic displays",
];

const RULE: &str = "==================================================";

/// Mode picked from the start-up menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Interactive,
    Demo,
    Api,
    Exit,
}

/// Ask which mode to run. Unknown answers fall back to interactive mode.
pub async fn choose_mode<R, W>(input: &mut R, output: &mut W) -> io::Result<Mode>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    write_line(output, "\nChoose mode:").await?;
    write_line(output, "1. Interactive mode").await?;
    write_line(output, "2. Quick demo").await?;
    write_line(output, "3. API Server mode").await?;
    write_line(output, "4. Exit").await?;

    let Some(answer) = ask(input, output, "\nEnter choice (1-4): ").await? else {
        return Ok(Mode::Exit);
    };

    Ok(match answer.as_str() {
        "1" => Mode::Interactive,
        "2" => Mode::Demo,
        "3" => Mode::Api,
        "4" => {
            write_line(output, "👋 Goodbye!").await?;
            Mode::Exit
        }
        _ => {
            write_line(output, "❌ Invalid choice, starting interactive mode...").await?;
            Mode::Interactive
        }
    })
}

/// Line announced before every generation.
pub fn generating_line(options: &GenerateOptions) -> String {
    format!(
        "\n🎨 Generating {} image(s) with prompt: '{}'",
        options.count, options.prompt
    )
}

/// Human-readable summary of a generation, as printed after each run.
pub fn render_result(result: &GenerationResult) -> String {
    if !result.success {
        return format!(
            "❌ Error generating images: {}",
            result.error.as_deref().unwrap_or("unknown error")
        );
    }

    let mut out = format!(
        "\n✅ Successfully generated {} image(s)\n📝 Original prompt: {}\n",
        result.count, result.original_prompt
    );
    for image in &result.images {
        out.push_str(&format!("\n🖼️ Image {}:\n", image.index));
        out.push_str(&format!("   Revised prompt: {}\n", image.revised_prompt));
        if let Some(url) = &image.url {
            out.push_str(&format!("   URL: {url}\n"));
        }
        if let Some(path) = &image.saved_path {
            out.push_str(&format!("   Saved to: {path}\n"));
        }
    }
    out
}

/// Interactive session bound to one generator and one pair of streams.
pub struct Console<R, W> {
    generator: ImageGenerator,
    input: R,
    output: W,
    session: SessionLog,
}

impl<R, W> Console<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(generator: ImageGenerator, input: R, output: W) -> Self {
        Self {
            generator,
            input,
            output,
            session: SessionLog::new(),
        }
    }

    pub fn session(&self) -> &SessionLog {
        &self.session
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Menu loop: generate, view history, save log, exit.
    pub async fn run_interactive(&mut self) -> io::Result<()> {
        self.say("🎨 Welcome to Grok 2 Image Generator!").await?;
        self.say(RULE).await?;

        loop {
            self.say(&format!("\n{RULE}")).await?;
            self.say("What would you like to do?").await?;
            self.say("1. Generate images from text prompt").await?;
            self.say("2. View session history").await?;
            self.say("3. Save session log").await?;
            self.say("4. Exit").await?;

            let Some(choice) = self.ask("\nEnter your choice (1-4): ").await? else {
                break;
            };

            match choice.as_str() {
                "1" => {
                    if !self.generate_from_prompt().await? {
                        break;
                    }
                }
                "2" => self.show_history().await?,
                "3" => {
                    if self.session.is_empty() {
                        self.say("📭 No session data to save").await?;
                    } else {
                        self.save_session().await?;
                    }
                }
                "4" => {
                    if !self.session.is_empty() {
                        let answer = self
                            .ask("💾 Save session log before exit? (y/n): ")
                            .await?
                            .unwrap_or_default();
                        if answer.eq_ignore_ascii_case("y") {
                            self.save_session().await?;
                        }
                    }
                    self.say("👋 Goodbye!").await?;
                    break;
                }
                _ => self.say("❌ Invalid choice. Please enter 1-4").await?,
            }
        }

        Ok(())
    }

    /// List the example prompts and generate one image for the chosen one.
    pub async fn run_demo(&mut self) -> io::Result<Option<GenerationResult>> {
        self.say("🚀 Quick Demo Mode - Generating sample images").await?;
        self.say(RULE).await?;
        self.say("\n🎲 Available example prompts:").await?;
        for (i, prompt) in EXAMPLE_PROMPTS.iter().enumerate() {
            self.say(&format!("  {}. {prompt}", i + 1)).await?;
        }

        let question = format!("\nChoose a prompt (1-{}): ", EXAMPLE_PROMPTS.len());
        let Some(answer) = self.ask(&question).await? else {
            return Ok(None);
        };

        let choice = match answer.parse::<usize>() {
            Ok(n) => n,
            Err(_) => {
                self.say("❌ Please enter a valid number").await?;
                return Ok(None);
            }
        };

        let Some(prompt) = choice.checked_sub(1).and_then(|i| EXAMPLE_PROMPTS.get(i)) else {
            self.say("❌ Invalid choice").await?;
            return Ok(None);
        };

        let options = GenerateOptions::new(*prompt);
        self.say(&generating_line(&options)).await?;
        let result = self.generator.generate(options).await;
        self.say(&render_result(&result)).await?;
        Ok(Some(result))
    }

    // ---- private helpers ----

    /// Returns `false` when input ended mid-way.
    async fn generate_from_prompt(&mut self) -> io::Result<bool> {
        let Some(prompt) = self.ask("\n📝 Enter your image prompt: ").await? else {
            return Ok(false);
        };
        if prompt.is_empty() {
            self.say("❌ Please enter a valid prompt").await?;
            return Ok(true);
        }

        let Some(count) = self.ask("🔢 How many images? (1-10, default 1): ").await? else {
            return Ok(false);
        };
        let count = if count.is_empty() {
            1
        } else {
            count.parse::<i64>().map(clamp_count).unwrap_or(1)
        };

        let Some(format) = self.ask("📁 Format (url/b64): ").await? else {
            return Ok(false);
        };

        let options = GenerateOptions::new(prompt)
            .with_count(i64::from(count))
            .with_format(ResponseFormat::from_cli(&format));
        self.say(&generating_line(&options)).await?;
        let result = self.generator.generate(options).await;

        self.say(&render_result(&result)).await?;
        self.session.push(result);
        Ok(true)
    }

    async fn show_history(&mut self) -> io::Result<()> {
        if self.session.is_empty() {
            return self.say("📭 No images generated in this session yet").await;
        }

        self.say(&format!(
            "\n📊 Session History ({} generations):",
            self.session.len()
        ))
        .await?;
        for line in self.session.summary_lines() {
            self.say(&format!("  {line}")).await?;
        }
        Ok(())
    }

    async fn save_session(&mut self) -> io::Result<()> {
        let dir = self.generator.store().root().to_path_buf();
        match self.session.save(&dir, None).await {
            Ok(path) => {
                self.say(&format!("📋 Session log saved to: {}", path.display()))
                    .await
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to save session log");
                self.say(&format!("❌ Failed to save session log: {e}")).await
            }
        }
    }

    async fn say(&mut self, text: &str) -> io::Result<()> {
        write_line(&mut self.output, text).await
    }

    async fn ask(&mut self, question: &str) -> io::Result<Option<String>> {
        ask(&mut self.input, &mut self.output, question).await
    }
}

/// Write `text` plus a newline and flush.
pub async fn write_line<W: AsyncWrite + Unpin>(output: &mut W, text: &str) -> io::Result<()> {
    output.write_all(text.as_bytes()).await?;
    output.write_all(b"\n").await?;
    output.flush().await
}

/// Print `question` and read one trimmed line; `None` at end of input.
async fn ask<R, W>(input: &mut R, output: &mut W, question: &str) -> io::Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    output.write_all(question.as_bytes()).await?;
    output.flush().await?;

    let mut line = String::new();
    if input.read_line(&mut line).await? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}
