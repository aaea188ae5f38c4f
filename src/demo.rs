//! Sample handler served by the binary.

use serde::{Deserialize, Serialize};
use webapi_dispatch::{web_api_handler, Properties, WebApiHttpContext, WebApiObject};

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

#[derive(Debug, Default)]
pub struct TestHandler;

// Methods needing query keys come first: implicit actions take the first match.
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
