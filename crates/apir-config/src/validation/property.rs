//! # Property Validator
//!
//! Checks one supplied value against a [`PropertyDescription`]: presence,
//! cardinality, per-element type, numeric range, options, pattern, and the
//! `includes` / `excludes` constraints. Every failure goes through the same
//! mode table as configuration-level findings.
//!
//! Unless live values are validated, string values carrying a `$[...]`
//! placeholder are taken as resolved later and skip the element checks.

use serde_json::Value;

use apir_core::Mode;

use crate::property::{PropertyDescription, PropertyType};
use crate::validation::result::{record, PropertyValidationResult};

const PLACEHOLDER_START: &str = "$[";

/// Validates single property values.
#[derive(Debug, Clone, Copy, Default)]
pub struct PropertyValidator {
    live_values: bool,
}

struct Context<'a> {
    desc: &'a PropertyDescription,
    mode: Mode,
    result: PropertyValidationResult,
}

impl Context<'_> {
    fn fail(&mut self, msg: &str) {
        record(&mut self.result, self.mode, Some(&self.desc.describable), msg);
    }
}

impl PropertyValidator {
    /// Validator for configuration-time values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: validate live (placeholder-resolved) values.
    pub fn with_live_values(mut self, live_values: bool) -> Self {
        self.live_values = live_values;
        self
    }

    /// Whether live values are validated.
    pub fn is_live_values(&self) -> bool {
        self.live_values
    }

    /// Validate `value` against `desc`; the property's own mode wins over `mode`.
    pub fn validate(&self, value: Option<&Value>, desc: &PropertyDescription, mode: Mode) -> PropertyValidationResult {
        let mut ctx = Context {
            desc,
            mode: desc.mode.unwrap_or(mode),
            result: PropertyValidationResult::default(),
        };

        let value = match value {
            None | Some(Value::Null) => {
                if desc.required {
                    ctx.fail("No value provided");
                }
                return ctx.result;
            }
            Some(v) => v,
        };

        if let Some(deprecated) = &desc.describable.deprecated {
            record(&mut ctx.result, Mode::Lenient, Some(&desc.describable), deprecated);
        }

        let values: Vec<&Value> = match value {
            Value::Array(items) => {
                let limit = if desc.is_single_valued() { 1 } else { desc.cardinality };
                if limit > 0 && items.len() > limit as usize {
                    ctx.fail(&format!(
                        "Array/collection contains too many elements, allowed {limit}"
                    ));
                }
                items.iter().collect()
            }
            other => vec![other],
        };

        for v in &values {
            self.validate_value(&mut ctx, v);
        }
        validate_includes_excludes(&mut ctx, &values);

        ctx.result
    }

    fn validate_value(&self, ctx: &mut Context<'_>, value: &Value) {
        if let Value::String(s) = value {
            if !self.live_values && s.contains(PLACEHOLDER_START) {
                return;
            }
        }
        if value.is_null() {
            ctx.fail("Null value provided for validation");
            return;
        }
        if value.is_array() || value.is_object() {
            ctx.fail("Value is not a scalar");
            return;
        }

        match ctx.desc.property_type {
            PropertyType::String => {}
            PropertyType::Boolean => validate_boolean(ctx, value),
            PropertyType::Byte => validate_integer(ctx, value, i64::from(i8::MIN), i64::from(i8::MAX), "byte"),
            PropertyType::Short => {
                validate_integer(ctx, value, i64::from(i16::MIN), i64::from(i16::MAX), "short")
            }
            PropertyType::Integer => {
                validate_integer(ctx, value, i64::from(i32::MIN), i64::from(i32::MAX), "integer")
            }
            PropertyType::Long => validate_integer(ctx, value, i64::MIN, i64::MAX, "long"),
            PropertyType::Float => validate_decimal(ctx, value, "float"),
            PropertyType::Double => validate_decimal(ctx, value, "double"),
            PropertyType::Character => {
                let ok = matches!(value, Value::String(s) if s.chars().count() == 1);
                if !ok {
                    ctx.fail("Value is not a character");
                }
            }
            PropertyType::Password => {
                if !self.live_values {
                    ctx.fail("Value for a password must use a placeholder");
                } else if !value.is_string() {
                    ctx.fail("Value is not a string");
                }
            }
            PropertyType::Url => {
                if !value.as_str().is_some_and(is_url) {
                    ctx.fail("Value is not a valid URL");
                }
            }
            PropertyType::Email => {
                if !value.as_str().is_some_and(is_email) {
                    ctx.fail("Not a valid email address");
                }
            }
            PropertyType::Path => {
                if !value.as_str().is_some_and(|s| s.starts_with('/')) {
                    ctx.fail("Value is not a valid path");
                }
            }
        }

        let text = as_text(value);
        if let Some(options) = &ctx.desc.options {
            if !options.iter().any(|o| o.value == text) {
                ctx.fail(&format!("Value '{text}' does not match provided options"));
            }
        }
        if let Some(pattern) = &ctx.desc.regex {
            if !pattern.is_match(&text) {
                ctx.fail(&format!("Value '{text}' does not match regex {pattern}"));
            }
        }
    }
}

fn as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn validate_boolean(ctx: &mut Context<'_>, value: &Value) {
    let ok = match value {
        Value::Bool(_) => true,
        Value::String(s) => s.eq_ignore_ascii_case("true") || s.eq_ignore_ascii_case("false"),
        _ => false,
    };
    if !ok {
        ctx.fail("Boolean value must either be true or false");
    }
}

fn validate_integer(ctx: &mut Context<'_>, value: &Value, min: i64, max: i64, label: &str) {
    let parsed = match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    match parsed {
        Some(n) if n >= min && n <= max => check_range(ctx, n as f64, &n.to_string()),
        _ => ctx.fail(&format!("Value is not a {label}")),
    }
}

fn validate_decimal(ctx: &mut Context<'_>, value: &Value, label: &str) {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match parsed {
        Some(n) if n.is_finite() => check_range(ctx, n, &as_text(value)),
        _ => ctx.fail(&format!("Value is not a {label}")),
    }
}

fn check_range(ctx: &mut Context<'_>, n: f64, text: &str) {
    let Some(range) = ctx.desc.range.clone() else {
        return;
    };
    if let Some(min) = range.min.as_ref().and_then(|m| m.as_f64()) {
        if n < min {
            ctx.fail(&format!(
                "Value {text} is too low; should not be lower than {}",
                range.min.as_ref().map(ToString::to_string).unwrap_or_default()
            ));
        }
    }
    if let Some(max) = range.max.as_ref().and_then(|m| m.as_f64()) {
        if n > max {
            ctx.fail(&format!(
                "Value {text} is too high; should not be higher than {}",
                range.max.as_ref().map(ToString::to_string).unwrap_or_default()
            ));
        }
    }
}

fn validate_includes_excludes(ctx: &mut Context<'_>, values: &[&Value]) {
    let texts: Vec<String> = values.iter().map(|v| as_text(v)).collect();
    if let Some(includes) = ctx.desc.includes.clone() {
        for inc in includes {
            if !texts.contains(&inc) {
                ctx.fail(&format!("Required included value {inc} not found"));
            }
        }
    }
    if let Some(excludes) = ctx.desc.excludes.clone() {
        for exc in excludes {
            if texts.contains(&exc) {
                ctx.fail(&format!("Not allowed excluded value {exc} found"));
            }
        }
    }
}

fn is_url(s: &str) -> bool {
    let Some((scheme, rest)) = s.split_once(':') else {
        return false;
    };
    let mut chars = scheme.chars();
    let scheme_ok = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    scheme_ok && !rest.is_empty() && !rest.chars().any(char::is_whitespace)
}

fn is_email(s: &str) -> bool {
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !s.chars().any(char::is_whitespace)
}
