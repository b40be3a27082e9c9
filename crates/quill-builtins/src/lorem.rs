//! Lorem Ipsum: deterministic placeholder text.

use std::sync::Arc;

use anyhow::bail;
use async_trait::async_trait;
use serde_json::{Value, json};

use quill_extension::prelude::*;

pub const EXTENSION_ID: &str = "lorem-ipsum";
pub const PANEL_ID: &str = "lorem-panel";

pub const CMD_GENERATE: &str = "lorem.generate";

pub const SETTING_COUNT: &str = "lorem.count";
pub const SETTING_UNIT: &str = "lorem.unit";

pub const UNITS: [&str; 3] = ["paragraphs", "sentences", "words"];

const MAX_COUNT: u64 = 100;
const WORDS_PER_SENTENCE: usize = 8;
const SENTENCES_PER_PARAGRAPH: usize = 4;

const WORDS: &[&str] = &[
    "lorem", "ipsum", "dolor", "sit", "amet", "consectetur", "adipiscing", "elit", "sed", "do",
    "eiusmod", "tempor", "incididunt", "ut", "labore", "et", "dolore", "magna", "aliqua", "enim",
    "ad", "minim", "veniam", "quis", "nostrud", "exercitation", "ullamco", "laboris", "nisi",
    "aliquip", "ex", "ea", "commodo", "consequat", "duis", "aute", "irure", "in", "reprehenderit",
    "voluptate", "velit", "esse", "cillum", "fugiat", "nulla", "pariatur", "excepteur", "sint",
    "occaecat", "cupidatat", "non", "proident", "sunt", "culpa", "qui", "officia", "deserunt",
    "mollit", "anim", "id", "est", "laborum",
];

pub const README: &str = "\
# Lorem Ipsum

Generate placeholder text.

`lorem.generate` accepts an optional count and unit (`paragraphs`,
`sentences`, or `words`); both default to the `lorem.*` settings. Output
is deterministic, so the same request always yields the same text.
";

/// The placeholder text extension.
#[derive(Debug, Default)]
pub struct LoremExtension;

impl LoremExtension {
    /// Creates the extension.
    pub fn new() -> Self {
        Self
    }

    /// Manifest.
    pub fn manifest() -> ExtensionManifest {
        ExtensionManifest::new(EXTENSION_ID, "Lorem Ipsum", "1.0.0")
            .with_description("Generate placeholder text")
            .with_author("Quill")
            .with_icon("file-text")
            .with_readme(README)
    }

    /// Declared settings.
    pub fn settings() -> Vec<SettingDescriptor> {
        vec![
            SettingDescriptor::number(SETTING_COUNT, "Count", 3)
                .with_description("How many units to generate")
                .in_section("Lorem Ipsum"),
            SettingDescriptor::select(SETTING_UNIT, "Unit", &UNITS, "paragraphs")
                .with_description("Unit of generated text")
                .in_section("Lorem Ipsum"),
        ]
    }
}

/// Registration bundle.
pub fn module() -> ExtensionModule {
    ExtensionModule::new(LoremExtension::manifest(), Arc::new(LoremExtension::new()))
        .with_settings(LoremExtension::settings())
}

#[async_trait]
impl Extension for LoremExtension {
    async fn activate(&self, ctx: ExtensionContext) -> anyhow::Result<()> {
        let generate_ctx = ctx.clone();
        ctx.register_command(CMD_GENERATE, move |args| {
            let ctx = generate_ctx.clone();
            async move {
                let settings = ctx.get_settings().await;
                let count = match args.first() {
                    Some(value) => value
                        .as_u64()
                        .ok_or_else(|| anyhow::anyhow!("count must be a positive integer"))?,
                    None => settings.unsigned(SETTING_COUNT).unwrap_or(3),
                };
                let unit = match args.get(1).and_then(Value::as_str) {
                    Some(unit) => unit.to_string(),
                    None => settings.select(SETTING_UNIT).unwrap_or("paragraphs").to_string(),
                };
                Ok(Value::String(generate(count, &unit)?))
            }
        })?;

        ctx.register_sidebar_panel(
            PANEL_ID,
            PanelOptions::new("file-text", "Lorem Ipsum"),
            Arc::new(|| {
                json!({
                    "view": "lorem-ipsum",
                    "command": CMD_GENERATE,
                    "units": UNITS,
                })
            }),
        )
        .await?;

        Ok(())
    }
}

/// Generates `count` units of placeholder text.
pub fn generate(count: u64, unit: &str) -> anyhow::Result<String> {
    if count == 0 || count > MAX_COUNT {
        bail!("count must be between 1 and {MAX_COUNT}, got {count}");
    }
    let count = count as usize;

    let text = match unit {
        "words" => (0..count).map(word).collect::<Vec<_>>().join(" "),
        "sentences" => (0..count).map(sentence).collect::<Vec<_>>().join(" "),
        "paragraphs" => (0..count)
            .map(|p| {
                (0..SENTENCES_PER_PARAGRAPH)
                    .map(|s| sentence(p * SENTENCES_PER_PARAGRAPH + s))
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect::<Vec<_>>()
            .join("\n\n"),
        other => bail!("unknown unit '{other}', expected one of {}", UNITS.join(", ")),
    };
    Ok(text)
}

fn word(index: usize) -> &'static str {
    WORDS[index % WORDS.len()]
}

/// The `index`-th sentence: capitalised, period-terminated.
fn sentence(index: usize) -> String {
    // Stride through the word list so consecutive sentences differ.
    let start = index * (WORDS_PER_SENTENCE + 3);
    let words: Vec<&str> = (start..start + WORDS_PER_SENTENCE).map(word).collect();
    let mut text = words.join(" ");
    if let Some(capital) = text.get(..1).map(str::to_uppercase) {
        text.replace_range(..1, &capital);
    }
    text.push('.');
    text
}
