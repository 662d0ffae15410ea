//! Subcommand implementations

use anyhow::{bail, Context};
use clap::{Args, Subcommand};
use form_preview::{build_initial_values, build_validation_rules, collect_leaf_fields, FormValues};
use serde_json::{json, Value};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use template_editor::TemplateEditor;
use template_model::{Element, ElementTree, TemplateState};
use template_store::{export_template, load_template, save_template, BuilderSettings, SettingsManager};

#[derive(Args, Debug)]
pub struct TemplateArgs {
    /// Template JSON file
    pub template: PathBuf,
}

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Template JSON file
    pub template: PathBuf,

    /// JSON object of form values keyed by field name
    pub values: PathBuf,
}

#[derive(Args, Debug)]
pub struct NormalizeArgs {
    /// Template JSON file
    pub template: PathBuf,

    /// Write here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Single-line output regardless of settings
    #[arg(long)]
    pub compact: bool,
}

#[derive(Args, Debug)]
pub struct SettingsArgs {
    #[command(subcommand)]
    pub action: SettingsAction,
}

#[derive(Subcommand, Debug)]
pub enum SettingsAction {
    /// Print the settings in effect
    Show,

    /// Change individual settings and save them
    Set(SetSettingsArgs),

    /// Restore the defaults and save them
    Reset,
}

#[derive(Args, Debug, Default)]
pub struct SetSettingsArgs {
    /// Margin and padding, in px, given to new elements
    #[arg(long)]
    pub element_spacing: Option<f64>,

    /// Margin and padding, in px, given to new document field styles
    #[arg(long)]
    pub document_field_spacing: Option<f64>,

    /// Pretty-print exported templates
    #[arg(long)]
    pub pretty: Option<bool>,
}

pub async fn load_settings(dir: PathBuf) -> anyhow::Result<BuilderSettings> {
    let mut manager = SettingsManager::new(dir);
    let path = manager.settings_path().display().to_string();
    let settings = manager
        .load()
        .await
        .with_context(|| format!("reading {}", path))?;
    Ok(settings.clone())
}

// =============================================================================
// settings
// =============================================================================

pub async fn settings(dir: PathBuf, args: SettingsArgs) -> anyhow::Result<()> {
    let mut manager = SettingsManager::new(dir);
    let path = manager.settings_path().display().to_string();
    let current = apply_settings_action(&mut manager, args.action)
        .await
        .with_context(|| format!("updating {}", path))?;
    println!("{}", serde_json::to_string_pretty(&current)?);
    Ok(())
}

async fn apply_settings_action(
    manager: &mut SettingsManager,
    action: SettingsAction,
) -> template_store::Result<BuilderSettings> {
    manager.load().await?;
    match action {
        SettingsAction::Show => {}
        SettingsAction::Set(changes) => {
            let mut next = manager.get().clone();
            if let Some(spacing) = changes.element_spacing {
                next.style_defaults.element_spacing = spacing;
            }
            if let Some(spacing) = changes.document_field_spacing {
                next.style_defaults.document_field_spacing = spacing;
            }
            if let Some(pretty) = changes.pretty {
                next.export.pretty = pretty;
            }
            manager.update(next).await?;
            tracing::info!(path = %manager.settings_path().display(), "Saved settings");
        }
        SettingsAction::Reset => {
            manager.reset().await?;
            tracing::info!(path = %manager.settings_path().display(), "Restored default settings");
        }
    }
    Ok(manager.get().clone())
}

async fn open(path: &Path) -> anyhow::Result<TemplateState> {
    load_template(path)
        .await
        .with_context(|| format!("loading template {}", path.display()))
}

// =============================================================================
// inspect
// =============================================================================

pub async fn inspect(args: TemplateArgs, _settings: &BuilderSettings) -> anyhow::Result<()> {
    let state = open(&args.template).await?;
    print!("{}", render_outline(state.elements()));
    Ok(())
}

fn outline_line(element: &Element) -> String {
    let mut line = format!("{} {}", element.id(), element.element_type());
    if !element.props.label.is_empty() {
        let _ = write!(line, " \"{}\"", element.props.label);
    }
    if !element.props.name.is_empty() {
        let _ = write!(line, " [{}]", element.props.name);
    }
    if element.props.required {
        line.push_str(" *");
    }
    line
}

/// One line per element, indented two spaces per nesting level
pub fn render_outline(tree: &ElementTree) -> String {
    let mut out = String::new();
    for element in tree.iter_preorder() {
        let depth = tree.depth(element.id()).unwrap_or(1);
        let _ = writeln!(out, "{}{}", "  ".repeat(depth - 1), outline_line(element));
    }
    out
}

// =============================================================================
// fields / validate
// =============================================================================

pub async fn fields(args: TemplateArgs, _settings: &BuilderSettings) -> anyhow::Result<()> {
    let state = open(&args.template).await?;
    println!("{}", serde_json::to_string_pretty(&field_report(state.elements()))?);
    Ok(())
}

fn field_report(tree: &ElementTree) -> Value {
    let leaves = collect_leaf_fields(tree);
    let fields: Vec<Value> = leaves
        .iter()
        .map(|element| {
            json!({
                "id": element.id().to_string(),
                "type": element.element_type().to_string(),
                "name": element.props.name,
                "label": element.props.label,
                "required": element.props.required,
            })
        })
        .collect();

    json!({
        "fields": fields,
        "initialValues": build_initial_values(&leaves),
        "schema": build_validation_rules(&leaves),
    })
}

pub async fn validate(args: ValidateArgs, _settings: &BuilderSettings) -> anyhow::Result<()> {
    let state = open(&args.template).await?;
    let raw = tokio::fs::read_to_string(&args.values)
        .await
        .with_context(|| format!("reading {}", args.values.display()))?;
    let values: FormValues = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a JSON object of values", args.values.display()))?;

    let leaves = collect_leaf_fields(state.elements());
    let schema = build_validation_rules(&leaves);
    for name in schema.duplicate_names() {
        tracing::warn!(name = %name, "Several fields share this name; the last one's rule applies");
    }

    let errors = schema.validate(&values);
    if errors.is_empty() {
        println!("ok: {} field(s) valid", schema.rules().len());
        return Ok(());
    }
    for (name, message) in errors.iter() {
        println!("{}: {}", name, message);
    }
    bail!("{} field(s) failed validation", errors.len())
}

// =============================================================================
// blocks / normalize
// =============================================================================

pub async fn blocks(args: TemplateArgs, settings: &BuilderSettings) -> anyhow::Result<()> {
    let state = open(&args.template).await?;
    let editor = TemplateEditor::with_state(state, settings.style_defaults);
    println!("{}", serde_json::to_string_pretty(&editor.document_blocks())?);
    Ok(())
}

pub async fn normalize(args: NormalizeArgs, settings: &BuilderSettings) -> anyhow::Result<()> {
    let state = open(&args.template).await?;
    let pretty = settings.export.pretty && !args.compact;

    match &args.output {
        Some(path) => {
            save_template(&state, path, pretty)
                .await
                .with_context(|| format!("writing {}", path.display()))?;
            tracing::info!(path = %path.display(), "Wrote normalized template");
        }
        None => println!("{}", export_template(&state, pretty)?),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use template_editor::ElementPreset;
    use template_model::ElementPatch;

    fn sample_editor() -> TemplateEditor {
        let mut editor = TemplateEditor::new();
        let row = editor.add_preset(ElementPreset::Row, None).unwrap();
        let email = editor.add_preset(ElementPreset::EmailInput, Some(row)).unwrap();
        editor
            .update_element_properties(
                email,
                &ElementPatch {
                    required: Some(true),
                    ..Default::default()
                },
            )
            .unwrap();
        editor.add_preset(ElementPreset::Checkbox, None).unwrap();
        editor
    }

    #[test]
    fn test_outline() {
        let editor = sample_editor();
        let outline = render_outline(editor.elements());
        let lines: Vec<&str> = outline.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "element-1 row \"New Row\" [row_1]");
        assert_eq!(lines[1], "  element-2 input \"New Email Input\" [email-input_2] *");
        assert!(lines[2].starts_with("element-3 checkbox"));
    }

    #[test]
    fn test_field_report() {
        let editor = sample_editor();
        let report = field_report(editor.elements());
        assert_eq!(report["fields"].as_array().unwrap().len(), 2);
        assert_eq!(report["fields"][0]["required"], json!(true));
        assert_eq!(report["initialValues"]["checkbox_3"], json!(false));
    }

    #[tokio::test]
    async fn test_load_settings_reads_saved_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let dir = temp_dir.path().to_path_buf();
        assert_eq!(load_settings(dir.clone()).await.unwrap(), BuilderSettings::default());

        tokio::fs::write(dir.join("settings.json"), r#"{"export": {"pretty": false}}"#)
            .await
            .unwrap();
        let settings = load_settings(dir).await.unwrap();
        assert!(!settings.export.pretty);
        assert_eq!(settings.style_defaults.element_spacing, 8.0);
    }

    #[tokio::test]
    async fn test_settings_set_then_reset() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let mut manager = SettingsManager::new(temp_dir.path().to_path_buf());

        let changes = SetSettingsArgs {
            element_spacing: Some(3.0),
            pretty: Some(false),
            ..Default::default()
        };
        let updated = apply_settings_action(&mut manager, SettingsAction::Set(changes))
            .await
            .unwrap();
        assert_eq!(updated.style_defaults.element_spacing, 3.0);
        assert_eq!(updated.style_defaults.document_field_spacing, 0.0);
        assert!(!updated.export.pretty);

        let reloaded = load_settings(temp_dir.path().to_path_buf()).await.unwrap();
        assert_eq!(reloaded, updated);

        let shown = apply_settings_action(&mut manager, SettingsAction::Show)
            .await
            .unwrap();
        assert_eq!(shown, updated);

        let reset = apply_settings_action(&mut manager, SettingsAction::Reset)
            .await
            .unwrap();
        assert_eq!(reset, BuilderSettings::default());
        assert_eq!(
            load_settings(temp_dir.path().to_path_buf()).await.unwrap(),
            BuilderSettings::default()
        );
    }

    #[tokio::test]
    async fn test_normalize_to_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let input = temp_dir.path().join("in.json");
        let output = temp_dir.path().join("out.json");
        let editor = sample_editor();
        save_template(editor.state(), &input, false).await.unwrap();

        let args = NormalizeArgs {
            template: input,
            output: Some(output.clone()),
            compact: true,
        };
        normalize(args, &BuilderSettings::default()).await.unwrap();

        let written = tokio::fs::read_to_string(&output).await.unwrap();
        assert_eq!(written, export_template(editor.state(), false).unwrap());
    }
}
