//! Prettier: formats the active document through the host's formatter.

use std::sync::Arc;

use anyhow::{Context, bail};
use async_trait::async_trait;
use serde_json::{Value, json};
use tracing::debug;

use quill_core::host::HostRequest;
use quill_extension::prelude::*;

use crate::host_call::call_host;

pub const EXTENSION_ID: &str = "prettier";
pub const BUTTON_ID: &str = "prettier-format-btn";

pub const CMD_FORMAT_DOCUMENT: &str = "prettier.formatDocument";

pub const SETTING_TAB_WIDTH: &str = "prettier.tabWidth";
pub const SETTING_SEMI: &str = "prettier.semi";
pub const SETTING_SINGLE_QUOTE: &str = "prettier.singleQuote";
pub const SETTING_PRINT_WIDTH: &str = "prettier.printWidth";

pub const README: &str = "\
# Prettier

Opinionated code formatting for the active document.

Run `prettier.formatDocument` or click the wand button in the editor
toolbar. Indentation, semicolons, quote style, and line width follow the
`prettier.*` settings.
";

/// The formatter extension.
#[derive(Debug, Default)]
pub struct FormatterExtension;

impl FormatterExtension {
    /// Creates the extension.
    pub fn new() -> Self {
        Self
    }

    /// Manifest.
    pub fn manifest() -> ExtensionManifest {
        ExtensionManifest::new(EXTENSION_ID, "Prettier", "1.0.0")
            .with_description("Code formatter using Prettier")
            .with_author("Quill")
            .with_icon("wand")
            .with_readme(README)
    }

    /// Declared settings.
    pub fn settings() -> Vec<SettingDescriptor> {
        vec![
            SettingDescriptor::number(SETTING_TAB_WIDTH, "Tab Width", 2)
                .with_description("Number of spaces per indentation level")
                .in_section("Prettier"),
            SettingDescriptor::toggle(SETTING_SEMI, "Semicolons", true)
                .with_description("Print semicolons at the ends of statements")
                .in_section("Prettier"),
            SettingDescriptor::toggle(SETTING_SINGLE_QUOTE, "Single Quotes", false)
                .with_description("Use single instead of double quotes")
                .in_section("Prettier"),
            SettingDescriptor::number(SETTING_PRINT_WIDTH, "Print Width", 80)
                .with_description("Line length the printer wraps on")
                .in_section("Prettier"),
        ]
    }
}

/// Registration bundle.
pub fn module() -> ExtensionModule {
    ExtensionModule::new(FormatterExtension::manifest(), Arc::new(FormatterExtension::new()))
        .with_settings(FormatterExtension::settings())
}

#[async_trait]
impl Extension for FormatterExtension {
    async fn activate(&self, ctx: ExtensionContext) -> anyhow::Result<()> {
        let format_ctx = ctx.clone();
        ctx.register_command(CMD_FORMAT_DOCUMENT, move |args| {
            let ctx = format_ctx.clone();
            async move { format_document(&ctx, args).await }
        })?;

        ctx.window()
            .register_editor_button(
                EditorButtonOptions::new(BUTTON_ID, "Format", CMD_FORMAT_DOCUMENT)
                    .with_icon("wand")
                    .with_tooltip("Format Document (Prettier)")
                    .at(ToolbarPosition::Right),
            )
            .await?;

        Ok(())
    }
}

/// Formatter options derived from the current settings.
async fn options(ctx: &ExtensionContext) -> Value {
    let settings = ctx.get_settings().await;
    json!({
        "tabWidth": settings.unsigned(SETTING_TAB_WIDTH).unwrap_or(2),
        "semi": settings.toggle(SETTING_SEMI).unwrap_or(true),
        "singleQuote": settings.toggle(SETTING_SINGLE_QUOTE).unwrap_or(false),
        "printWidth": settings.unsigned(SETTING_PRINT_WIDTH).unwrap_or(80),
    })
}

/// `prettier.formatDocument(source, language?)`.
async fn format_document(ctx: &ExtensionContext, args: Vec<Value>) -> anyhow::Result<Value> {
    let mut args = args.into_iter();
    let Some(Value::String(source)) = args.next() else {
        bail!("expected the document text as the first argument");
    };
    let language = match args.next() {
        Some(Value::String(language)) => language,
        _ => "javascript".to_string(),
    };

    debug!(language = %language, bytes = source.len(), "Formatting document");

    let reply = call_host(
        ctx,
        HostRequest::FormatSource {
            source,
            language,
            options: options(ctx).await,
        },
    )
    .await?;

    let formatted = reply
        .get("formatted")
        .and_then(Value::as_str)
        .context("formatter reply has no formatted text")?;
    Ok(Value::String(formatted.to_string()))
}
