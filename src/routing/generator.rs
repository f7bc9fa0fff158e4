//! Reverse path generation.
//!
//! # Responsibilities
//! - Turn a built route plus parameters back into a request path
//! - Enforce constraints on generated values
//!
//! # Design Decisions
//! - Mandatory variables fall back to route defaults
//! - An optional group is emitted only when every variable inside it has
//!   an explicit parameter; otherwise the whole group is dropped

use crate::routing::options::Constraint;
use crate::routing::pattern::Segment;
use crate::routing::route::{BuiltRoute, Route};
use crate::routing::types::{Params, RoutingError, RoutingResult};

impl Route {
    /// Generate a path for this route from `params`.
    pub fn generate(&self, params: &Params) -> RoutingResult<String> {
        let built = self.build()?;
        let mut out = String::new();
        render(built, built.pattern.segments(), params, false, &mut out)?;
        if out.is_empty() {
            out.push('/');
        }
        Ok(out)
    }
}

/// Render `segments` into `out`. Inside an optional group, returns
/// `Ok(false)` as soon as a variable has no explicit parameter.
fn render(
    built: &BuiltRoute,
    segments: &[Segment],
    params: &Params,
    optional: bool,
    out: &mut String,
) -> RoutingResult<bool> {
    for segment in segments {
        match segment {
            Segment::Literal { text } => out.push_str(text),
            Segment::Optional { segments } => {
                let mut group = String::new();
                if render(built, segments, params, true, &mut group)? {
                    out.push_str(&group);
                }
            }
            Segment::Variable { name, .. } => {
                let value = match params.get(name) {
                    Some(value) => value,
                    None if optional => return Ok(false),
                    None => built.defaults.get(name).ok_or_else(|| {
                        RoutingError::MissingParameter {
                            path: built.path.clone(),
                            name: name.clone(),
                        }
                    })?,
                };
                check(built, name, value)?;
                out.push_str(value);
            }
        }
    }
    Ok(true)
}

fn check(built: &BuiltRoute, name: &str, value: &str) -> RoutingResult<()> {
    let constraint = built
        .var(name)
        .and_then(|v| v.constraint.as_ref())
        .or_else(|| built.requirements.get(name));

    let accepted = match constraint {
        None => true,
        Some(Constraint::Literal(expected)) => expected == value,
        Some(c) => c.compile().map(|re| re.is_match(value)).unwrap_or(false),
    };

    if accepted {
        Ok(())
    } else {
        Err(RoutingError::ParameterMismatch {
            name: name.to_string(),
            value: value.to_string(),
        })
    }
}
