use anyhow::Context;
use askama::Template;
use fancy_regex::Regex;

use crate::config::StateConfig;
use crate::error::GenError;
use crate::fieldspec::FieldSpec;
use crate::generator::templates::StateTemplateData;
use crate::generator::unit::{find_final_fields, first_class, InheritedField};

/// A parent unit this record extends, recovered from its generated text.
struct ParentUnit {
    class_name: String,
    fields: Vec<InheritedField>,
}

fn load_parent(path: &str) -> anyhow::Result<ParentUnit> {
    let content = std::fs::read_to_string(path).map_err(|e| GenError::MissingDependency {
        path: path.to_string(),
        reason: e.to_string(),
    })?;
    let class_name = first_class(&content).ok_or_else(|| GenError::MissingDependency {
        path: path.to_string(),
        reason: "no class declaration found".to_string(),
    })?;
    Ok(ParentUnit {
        class_name,
        fields: find_final_fields(&content),
    })
}

/// Equality-key filter: `include` is evaluated first, `exclude` wins when
/// both match. Compiled with `fancy_regex` so user patterns may use
/// lookaround (`^(?!nickname).*$`).
struct PropFilter {
    include: Option<Regex>,
    exclude: Option<Regex>,
}

impl PropFilter {
    fn from_config(cfg: &StateConfig) -> anyhow::Result<PropFilter> {
        let include = cfg
            .include
            .as_deref()
            .map(Regex::new)
            .transpose()
            .with_context(|| format!("Invalid include regex {:?}", cfg.include))?;
        let exclude = cfg
            .exclude
            .as_deref()
            .map(Regex::new)
            .transpose()
            .with_context(|| format!("Invalid exclude regex {:?}", cfg.exclude))?;
        Ok(PropFilter { include, exclude })
    }

    fn keeps(&self, name: &str) -> bool {
        if let Some(include) = &self.include {
            if !include.is_match(name).unwrap_or(false) {
                return false;
            }
        }
        if let Some(exclude) = &self.exclude {
            if exclude.is_match(name).unwrap_or(false) {
                return false;
            }
        }
        true
    }
}

/// Render the field declaration block entry for one field.
fn final_entry(field: &FieldSpec) -> String {
    let mut lines = Vec::new();
    if !field.trailing_comment.is_empty() {
        lines.push(field.trailing_comment.clone());
    }
    if let Some(key) = &field.serialization_key {
        lines.push(format!("@JsonKey(name: '{key}')"));
    }
    lines.push(format!("final {} {}", field.declared_type(), field.name));
    lines.join("\n  ")
}

/// Constructor parameter for one of the record's own fields.
fn ctor_param(field: &FieldSpec) -> String {
    if field.is_required() {
        format!("required this.{}", field.name)
    } else {
        format!("this.{}{}", field.name, field.default_expr)
    }
}

/// Compose the immutable value record (state class).
///
/// Pure with respect to its inputs apart from reading the optional parent
/// file: identical configs render byte-identical output.
pub fn compose_state(cfg: &StateConfig, notes: &str) -> anyhow::Result<String> {
    let class_name = cfg
        .name
        .clone()
        .ok_or_else(|| GenError::MissingRequiredField {
            what: "state class name (state.name)".to_string(),
        })?;
    if cfg.props.is_empty() {
        return Err(GenError::MissingRequiredField {
            what: "state props (state.props)".to_string(),
        }
        .into());
    }

    let fields: Vec<FieldSpec> = cfg.props.iter().map(|l| FieldSpec::parse(l)).collect();
    let filter = PropFilter::from_config(cfg)?;
    let parent = cfg.parent.as_deref().map(load_parent).transpose()?;

    let mut finals = Vec::new();
    let mut ctor = Vec::new();
    let mut copy_args = Vec::new();
    let mut copy_body = Vec::new();
    let mut props = Vec::new();

    if let Some(parent) = &parent {
        // Inherited fields are re-exposed as forwarding parameters; storage
        // and equality keys stay in the parent.
        for inherited in &parent.fields {
            if inherited.is_optional() {
                ctor.push(format!("super.{}", inherited.name));
            } else {
                ctor.push(format!("required super.{}", inherited.name));
            }
            copy_args.push(format!("{}? {}", inherited.bare_type(), inherited.name));
            copy_body.push(format!(
                "{name}: {name} ?? this.{name}",
                name = inherited.name
            ));
        }
        props.push("...super.props".to_string());
    }

    for field in &fields {
        finals.push(final_entry(field));
        ctor.push(ctor_param(field));
        copy_args.push(format!("{}? {}", field.type_name, field.name));
        copy_body.push(format!("{name}: {name} ?? this.{name}", name = field.name));
        if cfg.equal && filter.keeps(&field.name) {
            props.push(field.name.clone());
        }
    }

    let extends_clause = match (&parent, cfg.equal) {
        (Some(parent), _) => format!(" extends {}", parent.class_name),
        (None, true) => " extends Equatable".to_string(),
        (None, false) => String::new(),
    };

    let rendered = StateTemplateData {
        notes: notes.to_string(),
        has_part: cfg.part.is_some(),
        part_of: cfg.part.clone().unwrap_or_default(),
        use_json: cfg.use_json,
        has_converter: cfg.json_converter.is_some(),
        converter: cfg.json_converter.clone().unwrap_or_default(),
        class_name,
        extends_clause,
        finals: finals.join(";\n  "),
        ctor_params: format!("{{{}}}", ctor.join(", ")),
        has_init: cfg.init,
        copy_args: format!("{{{}}}", copy_args.join(", ")),
        copy_body: copy_body.join(",\n      "),
        has_props: cfg.equal,
        props: props.join(",\n    "),
    }
    .render()?;
    Ok(rendered)
}
