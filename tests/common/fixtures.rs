use dao_core::{
    Api, CallOptions, DaoError, Data, Doc, Interrupt, InterfaceRegistry, Parser, Path,
};
use serde_json::{json, Value};

/// Main fixture api exercised by the dispatch and parameter suites
#[derive(Debug, Default)]
pub struct Accounts {
    pub audits: Vec<String>,
}

impl Api for Accounts {
    fn interfaces(registry: &mut InterfaceRegistry<Self>) {
        registry.description("list accounts");
        registry.interface("/accounts", |api| {
            api.set("accounts", json!(["checking", "savings"]))?;
            Ok(())
        });

        registry.interface("/accounts/show", |api| {
            api.set("looked_up", json!(true))?;
            let id = api.required_parameter("id")?;
            api.set("id", id.unwrap_or_default())?;
            Ok(())
        });

        registry.interface("/accounts/lookup", |api| {
            let value = api.parameter(["a", "b"])?;
            api.set("found", json!(value.is_some()))?;
            api.set("value", value.unwrap_or_default())?;
            Ok(())
        });

        registry.interface("/accounts/halt", |api| {
            api.set("before", json!(1))?;
            api.halt::<()>()?;
            api.set("after", json!(2))?;
            Ok(())
        });

        registry.interface("/accounts/inner", |api| {
            api.set("inner", json!("started"))?;
            api.halt::<()>()?;
            api.set("inner", json!("finished"))?;
            Ok(())
        });

        registry.interface("/accounts/outer", |api| {
            let inner = api.call("/accounts/inner", json!({}))?;
            api.set("inner_result", inner.data.into_value())?;
            let depth = api.call_depth();
            api.set("depth_after_inner", json!(depth))?;
            api.halt_with::<()>(202)?;
            api.set("unreachable", json!(true))?;
            Ok(())
        });

        registry.interface_with_doc(
            "/accounts/nested",
            Some(Doc::description("calls show without an id").with("since", json!("1.0"))),
            |api| {
                let inner = api.call("/accounts/show", json!({}))?;
                api.set("inner_status", json!(inner.status.map(|s| s.code)))?;
                api.set("inner_errors", json!(inner.errors.full_messages()))?;
                api.set("outer_ran", json!(true))?;
                Ok(())
            },
        );

        registry.interface("/accounts/fail", |api| {
            api.set("partial", json!(true))?;
            Err(Interrupt::fail("ledger unavailable"))
        });

        registry.interface("/accounts/panic", |_| panic!("handler exploded"));

        registry.interface("/accounts/create", |api| {
            let name = api.parameter("name")?;
            api.set("name", name.unwrap_or_default())?;
            api.validates_presence_of("name")?;
            api.ensure_valid()?;
            api.status(201)?;
            Ok(())
        });

        registry.interface("/accounts/audit", |api| {
            let path = api.context()?.path();
            api.api_mut().audits.push(path);
            Ok(())
        });
    }
}

/// Api with nothing registered
pub struct Empty;

impl Api for Empty {
    fn interfaces(_registry: &mut InterfaceRegistry<Self>) {}
}

/// Api registering the same path twice
pub struct Duplicates;

impl Api for Duplicates {
    fn interfaces(registry: &mut InterfaceRegistry<Self>) {
        registry.interface("/dup", |api| {
            api.set("version", json!(1))?;
            Ok(())
        });
        registry.description("second registration");
        registry.interface("dup/", |api| {
            api.set("version", json!(2))?;
            Ok(())
        });
    }
}

/// Api serving its own `/index`
pub struct CustomIndex;

impl Api for CustomIndex {
    fn interfaces(registry: &mut InterfaceRegistry<Self>) {
        registry.interface("/index", |api| {
            api.set("custom", json!(true))?;
            Ok(())
        });
    }
}

/// Parser that rejects every call
pub struct RejectingParser;

impl Parser for RejectingParser {
    fn parse(&self, path: &Path, _params: Value, _options: &CallOptions) -> dao_core::Result<Data> {
        Err(DaoError::Parse {
            path: path.to_string(),
            reason: "rejected".to_string(),
        })
    }
}

/// Parser that hands the call options to handlers as the `b` param
pub struct OptionsParser;

impl Parser for OptionsParser {
    fn parse(&self, _path: &Path, params: Value, options: &CallOptions) -> dao_core::Result<Data> {
        let mut data = Data::from_value(params).unwrap_or_default();
        data.set("b", Value::Object(options.clone()));
        Ok(data)
    }
}
