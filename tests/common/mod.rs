//! Shared handlers and helpers for integration testing.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};

use serde::{Deserialize, Serialize};
use webapi_dispatch::{web_api_handler, Properties, WebApiHttpContext, WebApiObject, WebApiRouter};

pub const APPLICATION_NAME: &str = "api";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TestObject {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Age")]
    pub age: i32,
}

impl WebApiObject for TestObject {
    fn properties(properties: &mut Properties<Self>) {
        properties
            .property("Name", |obj: &mut TestObject, value| obj.name = value)
            .property("Age", |obj: &mut TestObject, value| obj.age = value);
    }
}

static FAILURES: AtomicUsize = AtomicUsize::new(0);

/// Number of times `Fail` has been invoked across the test binary.
pub fn failures() -> usize {
    FAILURES.load(Ordering::SeqCst)
}

#[derive(Debug, Default)]
pub struct TestHandler;

web_api_handler! {
    #[handler("Test")]
    impl TestHandler {
        #[get]
        pub fn Hello1(&self, context: WebApiHttpContext, name: String, age: i32) {
            context
                .response()
                .write(&format!("Hello {name}, your age is {age}"));
        }

        #[get]
        pub fn Hello2(&self, context: WebApiHttpContext, #[from_url] obj: TestObject) {
            context
                .response()
                .write(&format!("Hello {}, your age is {}", obj.name, obj.age));
        }

        #[get]
        pub fn GetObject(&self, context: WebApiHttpContext) {
            context.response().write(&TestObject {
                name: "Justin".to_string(),
                age: 10,
            });
        }

        #[post]
        pub fn Hello3(&self, context: WebApiHttpContext, name: String, age: i32) {
            context
                .response()
                .write(&format!("Hello {name}, your age is {age}"));
        }

        #[post]
        pub fn Hello4(&self, context: WebApiHttpContext, #[from_body] obj: TestObject) {
            context
                .response()
                .write(&format!("Hello {}, your age is {}", obj.name, obj.age));
        }
    }
}

#[derive(Debug, Default)]
pub struct ItemsHandler;

web_api_handler! {
    #[handler("Items", version = 2)]
    impl ItemsHandler {
        #[put]
        pub fn Rename(&self, context: WebApiHttpContext, id: u32, #[from_body] name: String) {
            context.response().write(&format!("{id}:{name}"));
        }

        #[delete]
        pub fn Remove(&self, context: WebApiHttpContext, id: u32) {
            let _ = id;
            context.response().write_no_content();
        }

        #[get]
        pub fn Fail(&self, _context: WebApiHttpContext, reason: String) -> Result<(), String> {
            FAILURES.fetch_add(1, Ordering::SeqCst);
            Err(reason)
        }

        #[get]
        pub fn Explode(&self, _context: WebApiHttpContext) {
            panic!("handler exploded");
        }
    }
}

/// Router with both sample handlers under [`APPLICATION_NAME`].
pub fn router() -> WebApiRouter {
    WebApiRouter::builder()
        .application_name(APPLICATION_NAME)
        .handler::<TestHandler>()
        .handler::<ItemsHandler>()
        .build()
        .unwrap()
}
