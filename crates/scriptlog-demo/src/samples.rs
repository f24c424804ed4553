//! Sample script values and the calls a game script would make with them

use crate::host::ScriptHost;
use scriptlog::{ChainError, Console, Fault, Function, LogArgs, Object, Value};
use serde_json::json;

/// A nested object with a self-reference, a failing getter and a method
pub fn player() -> Value {
    let player = Object::new();
    player
        .set("name", "ada")
        .set("level", 7)
        .set("stats", Value::from(json!({"hp": 12, "speed": 3.5})))
        .set("tags", Value::from(json!(["hero", "ranged"])))
        .set("self", &player)
        .define_getter(
            "secret",
            Function::new("secret", |_, _| Err(Fault::Thrown("locked".to_string()))),
        )
        .define_method("greet", |this, _| {
            Ok(Value::from(format!("hi, {}", this.get("name")?)))
        });
    Value::from(player)
}

pub fn enemies() -> Value {
    Value::from(json!([
        {"kind": "slime", "hp": 3},
        {"kind": "bat", "hp": 1}
    ]))
}

/// Log every sample from its own script function
pub fn run(console: &mut Console, host: &ScriptHost) -> Result<(), ChainError> {
    host.call("onStart", "Scripts/Game.js", 12, || {
        console.print(player(), LogArgs::new().note("~source").groups(["player"]))
    })?;

    host.call("spawn", "Scripts/Enemy.ts", 20, || {
        console.print(
            enemies(),
            LogArgs::new()
                .note("~source ~groupIds")
                .groups(["enemy", "spawn"]),
        )
    })?;

    host.call("onTap", "Scripts/Menu.js", 33, || {
        console.print(
            "menu opened",
            LogArgs::new()
                .note("~source")
                .groups(["ui"])
                .properties("toUpperCase()"),
        )
    })?;

    host.call("onUpdate", "Scripts/Player.js", 48, || {
        console.print(
            player(),
            LogArgs::new()
                .note("~properties")
                .groups(["player"])
                .properties("name.toUpperCase()"),
        )
    })?;

    host.call("onUpdate", "Scripts/Player.js", 51, || {
        console.print(1.23456, LogArgs::new().properties("toFixed(2)"))
    })
}
