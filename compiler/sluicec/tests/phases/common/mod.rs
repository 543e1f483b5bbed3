//! Shared host for phase tests.
//!
//! The host registers a small set of natives that log every call, so tests
//! can assert exactly which stages ran.

use std::sync::Arc;

use parking_lot::Mutex;
use sluicec::{
    buffer_tap, compile, native_failure, CompileError, Evaluator, Outcome, PipeChain, ScopeTable,
    SharedInterner, Signature, Value,
};

/// Names of natives in the order they were called.
pub type CallLog = Arc<Mutex<Vec<&'static str>>>;

pub struct Host {
    pub table: ScopeTable,
    pub log: CallLog,
}

impl Host {
    pub fn new() -> Self {
        let log: CallLog = Arc::default();
        let mut table = ScopeTable::new(SharedInterner::new());

        let l = Arc::clone(&log);
        table.register_function("load", Signature::piped(1).fallible(), move |args| {
            l.lock().push("load");
            Ok(match args[0].as_str() {
                Some("missing") => Value::err(Value::string("not found")),
                Some(path) => Value::ok(Value::string(format!("<{path}>"))),
                None => return Err(native_failure("load expects a path")),
            })
        });

        let l = Arc::clone(&log);
        table.register_function("parse", Signature::piped(1), move |args| {
            l.lock().push("parse");
            let text = args[0].as_str().unwrap_or_default();
            Ok(Value::list(
                text.chars().map(|c| Value::string(c.to_string())).collect(),
            ))
        });

        let l = Arc::clone(&log);
        table.register_function("size", Signature::piped(1), move |args| {
            l.lock().push("size");
            let n = args[0].as_list().map_or(0, <[Value]>::len);
            Ok(Value::int(i64::try_from(n).unwrap_or(i64::MAX)))
        });

        let l = Arc::clone(&log);
        table.register_function("describe", Signature::piped(1), move |args| {
            l.lock().push("describe");
            Ok(Value::string(format!("seen {}", args[0])))
        });

        let l = Arc::clone(&log);
        table.register_function("combine", Signature::new(2), move |args| {
            l.lock().push("combine");
            Ok(Value::list(vec![args[0].clone(), args[1].clone()]))
        });

        let l = Arc::clone(&log);
        table.register_method("append", Signature::new(1), move |recv, args| {
            l.lock().push("append");
            let Some(items) = recv.as_list_mut() else {
                return Err(native_failure("append on a non-list"));
            };
            items.push(args[0].clone());
            // The return value is discarded by `|.`.
            Ok(Value::string("ignored"))
        });

        let l = Arc::clone(&log);
        table.register_method("require_nonempty", Signature::new(0).fallible(), move |recv, _| {
            l.lock().push("require_nonempty");
            Ok(match recv.as_list() {
                Some(items) if !items.is_empty() => Value::ok(Value::Void),
                _ => Value::err(Value::string("empty")),
            })
        });

        table.declare_global("path");
        Host { table, log }
    }

    pub fn compile(&self, source: &str) -> PipeChain {
        compile(source, &self.table)
            .unwrap_or_else(|err| panic!("{}", err.render(source)))
    }

    pub fn compile_err(&self, source: &str) -> CompileError {
        compile(source, &self.table).expect_err("expected a compile error")
    }

    pub fn evaluator(&self, path: &str) -> Evaluator {
        Evaluator::builder(&self.table)
            .global("path", Value::string(path))
            .tap_handler(buffer_tap())
            .build()
    }

    pub fn run(&self, source: &str, path: &str) -> Outcome {
        let chain = self.compile(source);
        self.evaluator(path).run(&chain).unwrap()
    }

    /// Calls logged so far; clears the log.
    pub fn take_calls(&self) -> Vec<&'static str> {
        std::mem::take(&mut *self.log.lock())
    }
}

/// Error codes of a compile error, in report order.
pub fn codes(err: &CompileError) -> Vec<&'static str> {
    err.diagnostics().iter().map(|d| d.code.as_str()).collect()
}
