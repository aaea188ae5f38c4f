//! Declaration macros.

/// Expose the methods of an inherent `impl` block as web methods.
///
/// Every `fn` in the block is recorded with its name, visibility, attributes,
/// parameter names and parameter types, and gets a typed invocation thunk.
/// Methods without a verb attribute are kept as ordinary methods and skipped at
/// registration. Method names are the action names used in URLs, so
/// `PascalCase` names are allowed. All parameter types must implement
/// [`Bindable`](crate::handler::Bindable); helpers taking other types belong in
/// a separate `impl` block.
///
/// ```ignore
/// #[derive(Default)]
/// struct Greeter;
///
/// web_api_handler! {
///     #[handler("Greeter", version = 2)]
///     impl Greeter {
///         #[get]
///         pub fn hello(&self, ctx: WebApiHttpContext, name: String) {
///             ctx.response().write(&format!("Hello {name}"));
///         }
///
///         #[post]
///         pub fn create(&self, ctx: WebApiHttpContext, #[from_body] person: Person) {
///             ctx.response().write(&person);
///         }
///     }
/// }
/// ```
#[macro_export]
macro_rules! web_api_handler {
    (
        #[handler($name:expr $(, version = $version:expr)? $(,)?)]
        impl $handler:ident {
            $(
                $(#[$attr:meta])*
                $vis:vis fn $method:ident(
                    &self
                    $(, $(#[$param_attr:meta])* $param:ident : $param_ty:ty)*
                    $(,)?
                ) $(-> $ret:ty)? $body:block
            )*
        }
    ) => {
        #[allow(non_snake_case)]
        impl $handler {
            $(
                $vis fn $method(&self $(, $param: $param_ty)*) $(-> $ret)? $body
            )*
        }

        impl $crate::handler::WebApiHandler for $handler {
            fn mount() -> $crate::handler::Mount {
                $crate::handler::Mount::new($name)$(.with_version($version))?
            }

            fn declare(methods: &mut $crate::handler::MethodDeclarations<Self>) {
                $(
                    methods.add(
                        $crate::handler::MethodDeclaration::new(
                            stringify!($method),
                            |handler: &Self,
                             args: $crate::handler::Arguments|
                             -> ::std::result::Result<(), $crate::handler::InvokeError> {
                                #[allow(unused_mut, unused_variables)]
                                let mut args = args;
                                $(let $param = args.take::<$param_ty>()?;)*
                                $crate::handler::HandlerOutcome::into_outcome(
                                    handler.$method($($param),*),
                                )
                            },
                        )
                        .public(stringify!($vis) == "pub")
                        $(.attribute(stringify!($attr)))*
                        $(
                            .parameter(
                                $crate::handler::ParameterDeclaration::of::<$param_ty>(
                                    stringify!($param),
                                )
                                $(.attribute(stringify!($param_attr)))*
                            )
                        )*
                    );
                )*
            }
        }
    };
}

/// Implement [`Bindable`](crate::handler::Bindable) for [`Scalar`](crate::codec::Scalar) types.
#[macro_export]
macro_rules! bindable_scalar {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::handler::Bindable for $ty {
                fn descriptor() -> $crate::handler::TypeDescriptor {
                    $crate::handler::TypeDescriptor::scalar::<$ty>()
                }
            }
        )+
    };
}
