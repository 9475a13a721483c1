//! Dispatch handlers.
//!
//! A [`DispatchHandler`] turns the flat argument map received from the
//! engine into the argument set of the resolver method: grouped arguments
//! are collected into their container values, unsupplied optional
//! parameters receive their defaults, and the bound method is called.
//! Handlers hold only compiled metadata and are safe to share between
//! concurrent requests.

use std::sync::Arc;

use async_graphql::{ErrorExtensions, Name, Value};
use tracing::trace;

use crate::reflect::{Arguments, BoundCall};

/// Extension key carrying the original error message in debug mode.
pub const DEBUG_MESSAGE_KEY: &str = "debugMessage";

/// Extension key carrying the resolver call trace in debug mode.
pub const TRACE_KEY: &str = "trace";

/// How to rebuild one grouped parameter from flat arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupArgumentPlan {
    /// Group class the arguments were expanded from. The container itself
    /// is a plain object; [`Arguments::get`] binds it to a concrete type.
    pub class_name: String,
    /// Flat argument names collected into the container, in property order.
    pub arguments: Vec<String>,
    /// Parameter receiving the container.
    pub target: String,
}

impl GroupArgumentPlan {
    /// Moves the planned arguments out of `args` into one container value
    /// stored under the target parameter. Missing arguments become `null`.
    pub fn apply(&self, args: &mut Arguments) {
        let fields = self
            .arguments
            .iter()
            .map(|name| {
                let value = args.remove(name).unwrap_or(Value::Null);
                (Name::new(name), value)
            })
            .collect();
        trace!(
            class = %self.class_name,
            target = %self.target,
            "Collected grouped arguments"
        );
        args.insert(self.target.clone(), Value::Object(fields));
    }
}

/// Where a handler dispatches to; reported in debug traces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchTarget {
    pub resolver: &'static str,
    pub method: String,
    pub operation: String,
}

/// Executable binding of one operation to its resolver method.
#[derive(Clone)]
pub struct DispatchHandler {
    call: BoundCall,
    groups: Arc<[GroupArgumentPlan]>,
    defaults: Arc<[(String, Value)]>,
    target: Arc<DispatchTarget>,
}

impl DispatchHandler {
    pub(crate) fn new(
        call: BoundCall,
        groups: Vec<GroupArgumentPlan>,
        defaults: Vec<(String, Value)>,
        target: DispatchTarget,
    ) -> Self {
        Self {
            call,
            groups: groups.into(),
            defaults: defaults.into(),
            target: Arc::new(target),
        }
    }

    /// Group plans applied before each call.
    pub fn groups(&self) -> &[GroupArgumentPlan] {
        &self.groups
    }

    pub fn target(&self) -> &DispatchTarget {
        &self.target
    }

    /// Invokes the resolver method with the raw engine arguments.
    ///
    /// The method's return value is passed through unchanged. Errors are
    /// annotated with debug extensions that the service strips outside of
    /// debug mode.
    ///
    /// # Errors
    ///
    /// Returns whatever error the resolver method returned.
    pub fn call(&self, mut args: Arguments) -> async_graphql::Result<Value> {
        for plan in self.groups.iter() {
            plan.apply(&mut args);
        }
        for (name, default) in self.defaults.iter() {
            if !args.contains(name) {
                args.insert(name.clone(), default.clone());
            }
        }

        trace!(
            operation = %self.target.operation,
            method = %self.target.method,
            args = args.len(),
            "Dispatching resolver call"
        );

        (self.call)(&args).map_err(|err| self.annotate(err))
    }

    fn annotate(&self, err: async_graphql::Error) -> async_graphql::Error {
        let debug_message = Value::String(err.message.clone());
        let trace = Value::List(vec![Value::String(format!(
            "{}::{} ({})",
            self.target.resolver, self.target.method, self.target.operation
        ))]);
        err.extend_with(|_, ext| {
            ext.set(DEBUG_MESSAGE_KEY, debug_message);
            ext.set(TRACE_KEY, trace);
        })
    }
}

impl std::fmt::Debug for DispatchHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DispatchHandler")
            .field("target", &self.target)
            .field("groups", &self.groups)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use crate::value::json_to_graphql_value;

    fn echo_handler(
        groups: Vec<GroupArgumentPlan>,
        defaults: Vec<(String, Value)>,
    ) -> DispatchHandler {
        let call: BoundCall = Arc::new(|args: &Arguments| {
            let object = args
                .iter()
                .map(|(name, value)| (Name::new(name), value.clone()))
                .collect();
            Ok(Value::Object(object))
        });
        DispatchHandler::new(
            call,
            groups,
            defaults,
            DispatchTarget {
                resolver: "EchoResolver",
                method: "echo".into(),
                operation: "echo".into(),
            },
        )
    }

    #[test]
    fn test_plan_collects_flat_arguments() {
        let plan = GroupArgumentPlan {
            class_name: "AddressInput".into(),
            arguments: vec!["street".into(), "zip".into()],
            target: "address".into(),
        };
        let mut args = Arguments::from_json(json!({"street": "Main St", "zip": "12345"}));
        plan.apply(&mut args);

        assert_eq!(args.len(), 1);
        assert_eq!(
            args.value("address"),
            Some(&json_to_graphql_value(json!({"street": "Main St", "zip": "12345"})))
        );
    }

    #[test]
    fn test_plan_defaults_missing_to_null() {
        let plan = GroupArgumentPlan {
            class_name: "AddressInput".into(),
            arguments: vec!["street".into(), "zip".into()],
            target: "address".into(),
        };
        let mut args = Arguments::from_json(json!({"street": "Main St"}));
        plan.apply(&mut args);

        assert_eq!(
            args.value("address"),
            Some(&json_to_graphql_value(json!({"street": "Main St", "zip": null})))
        );
    }

    #[test]
    fn test_independent_groups_on_one_call() {
        let handler = echo_handler(
            vec![
                GroupArgumentPlan {
                    class_name: "PointInput".into(),
                    arguments: vec!["x".into()],
                    target: "point".into(),
                },
                GroupArgumentPlan {
                    class_name: "LabelInput".into(),
                    arguments: vec!["y".into()],
                    target: "label".into(),
                },
            ],
            Vec::new(),
        );

        let out = handler
            .call(Arguments::from_json(json!({"x": 1, "y": "z", "scale": 2})))
            .unwrap();
        assert_eq!(
            out,
            json_to_graphql_value(json!({
                "scale": 2,
                "point": {"x": 1},
                "label": {"y": "z"},
            }))
        );
    }

    #[test]
    fn test_defaults_fill_only_missing() {
        let handler = echo_handler(
            Vec::new(),
            vec![
                ("limit".into(), Value::Number(10.into())),
                ("offset".into(), Value::Number(0.into())),
            ],
        );
        let out = handler
            .call(Arguments::from_json(json!({"limit": 5})))
            .unwrap();
        assert_eq!(out, json_to_graphql_value(json!({"limit": 5, "offset": 0})));
    }

    #[test]
    fn test_error_is_annotated() {
        let call: BoundCall = Arc::new(|_: &Arguments| Err(async_graphql::Error::new("boom")));
        let handler = DispatchHandler::new(
            call,
            Vec::new(),
            Vec::new(),
            DispatchTarget {
                resolver: "FailingResolver",
                method: "explode".into(),
                operation: "explode".into(),
            },
        );

        let err = handler.call(Arguments::new()).unwrap_err();
        assert_eq!(err.message, "boom");
        let ext = serde_json::to_value(err.extensions.unwrap()).unwrap();
        assert_eq!(ext[DEBUG_MESSAGE_KEY], "boom");
        assert_eq!(ext[TRACE_KEY][0], "FailingResolver::explode (explode)");
    }
}
