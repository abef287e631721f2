//! Declarative macros for bot library development.

/// Export the `GetBotAPI` factory for a [`BotApi`](crate::BotApi) type.
///
/// The generated export returns null for any version token other than
/// [`BOT_API_VERSION`](crate::BOT_API_VERSION). The first accepted call
/// builds the instance; later calls return the same table, which lives until
/// the library is unloaded.
///
/// # Example
///
/// ```rust,ignore
/// use yapb_amxx_sdk::prelude::*;
///
/// #[derive(Default)]
/// struct MyBot;
///
/// impl BotApi for MyBot { /* ... */ }
///
/// // Uses `Default::default()`
/// export_bot_api!(MyBot);
///
/// // Or an explicit constructor
/// export_bot_api!(MyBot, MyBot::with_graph);
/// ```
#[macro_export]
macro_rules! export_bot_api {
    ($ty:ty) => {
        $crate::export_bot_api!($ty, <$ty as ::core::default::Default>::default);
    };
    ($ty:ty, $ctor:expr) => {
        #[no_mangle]
        #[allow(non_snake_case)]
        pub extern "C" fn GetBotAPI(version: i32) -> *const $crate::BotApiTable {
            static EXPORTED: ::std::sync::OnceLock<$crate::ExportedApi> =
                ::std::sync::OnceLock::new();

            if version != $crate::BOT_API_VERSION {
                return ::std::ptr::null();
            }

            EXPORTED
                .get_or_init(|| {
                    let api: $ty = ($ctor)();
                    $crate::ExportedApi::new(api)
                })
                .as_ptr()
        }
    };
}
