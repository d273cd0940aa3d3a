use dioxus::prelude::*;
use dioxus_router::{use_navigator, Link};

use crate::context::AppContext;
use crate::routes::Route;

#[component]
pub fn LoginView() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let auth = ctx.auth();
    let mut username = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut error = use_signal(|| None::<String>);
    let mut submitting = use_signal(|| false);

    rsx! {
        div { class: "page auth-page",
            form {
                class: "auth-form",
                onsubmit: move |evt| {
                    evt.prevent_default();
                    let auth = auth.clone();
                    let navigator = navigator;
                    spawn(async move {
                        submitting.set(true);
                        error.set(None);
                        let result = auth.login(&username(), &password()).await;
                        submitting.set(false);
                        match result {
                            Ok(()) => {
                                navigator.push(Route::Home {});
                            }
                            Err(err) => error.set(Some(err.to_string())),
                        }
                    });
                },
                h2 { class: "auth-title", "Sign in" }
                if let Some(message) = error() {
                    p { class: "auth-error", "{message}" }
                }
                label { class: "auth-field",
                    span { "Username" }
                    input {
                        r#type: "text",
                        name: "username",
                        autocomplete: "username",
                        value: "{username()}",
                        oninput: move |evt| username.set(evt.value()),
                    }
                }
                label { class: "auth-field",
                    span { "Password" }
                    input {
                        r#type: "password",
                        name: "password",
                        autocomplete: "current-password",
                        value: "{password()}",
                        oninput: move |evt| password.set(evt.value()),
                    }
                }
                button {
                    class: "btn btn-primary",
                    r#type: "submit",
                    disabled: submitting(),
                    "Sign in"
                }
                p { class: "auth-switch",
                    "No account yet? "
                    Link { to: Route::Register {}, "Register" }
                }
            }
        }
    }
}
