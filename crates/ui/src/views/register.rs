use dioxus::prelude::*;
use dioxus_router::{use_navigator, Link};

use services::RegisterRequest;

use crate::context::AppContext;
use crate::routes::Route;

#[component]
pub fn RegisterView() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let auth = ctx.auth();
    let mut username = use_signal(String::new);
    let mut email = use_signal(String::new);
    let mut first_name = use_signal(String::new);
    let mut last_name = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut password2 = use_signal(String::new);
    let mut error = use_signal(|| None::<String>);
    let mut submitting = use_signal(|| false);

    rsx! {
        div { class: "page auth-page",
            form {
                class: "auth-form",
                onsubmit: move |evt| {
                    evt.prevent_default();
                    if password() != password2() {
                        error.set(Some("Passwords do not match.".to_string()));
                        return;
                    }
                    let auth = auth.clone();
                    let navigator = navigator;
                    let request = RegisterRequest {
                        username: username(),
                        email: email(),
                        password: password(),
                        first_name: first_name(),
                        last_name: last_name(),
                    };
                    spawn(async move {
                        submitting.set(true);
                        error.set(None);
                        let result = auth.register(&request).await;
                        submitting.set(false);
                        match result {
                            Ok(()) => {
                                navigator.push(Route::Home {});
                            }
                            Err(err) => error.set(Some(err.to_string())),
                        }
                    });
                },
                h2 { class: "auth-title", "Register" }
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
                    span { "Email" }
                    input {
                        r#type: "email",
                        name: "email",
                        autocomplete: "email",
                        value: "{email()}",
                        oninput: move |evt| email.set(evt.value()),
                    }
                }
                label { class: "auth-field",
                    span { "First name" }
                    input {
                        r#type: "text",
                        name: "first_name",
                        autocomplete: "given-name",
                        value: "{first_name()}",
                        oninput: move |evt| first_name.set(evt.value()),
                    }
                }
                label { class: "auth-field",
                    span { "Last name" }
                    input {
                        r#type: "text",
                        name: "last_name",
                        autocomplete: "family-name",
                        value: "{last_name()}",
                        oninput: move |evt| last_name.set(evt.value()),
                    }
                }
                label { class: "auth-field",
                    span { "Password" }
                    input {
                        r#type: "password",
                        name: "password",
                        autocomplete: "new-password",
                        value: "{password()}",
                        oninput: move |evt| password.set(evt.value()),
                    }
                }
                label { class: "auth-field",
                    span { "Confirm password" }
                    input {
                        r#type: "password",
                        name: "password2",
                        autocomplete: "new-password",
                        value: "{password2()}",
                        oninput: move |evt| password2.set(evt.value()),
                    }
                }
                button {
                    class: "btn btn-primary",
                    r#type: "submit",
                    disabled: submitting(),
                    "Create account"
                }
                p { class: "auth-switch",
                    "Already have an account? "
                    Link { to: Route::Login {}, "Sign in" }
                }
            }
        }
    }
}
