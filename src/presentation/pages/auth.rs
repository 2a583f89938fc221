use leptos::*;

use crate::application::{self, AuthOutcome};
use crate::domain::{
    notifications::Toast,
    session::{AuthMode, User},
};
use crate::global_state::api;
use crate::presentation::{actions, components::AlertBox};

#[component]
pub fn AuthPage() -> impl IntoView {
    let (mode, set_mode) = create_signal(AuthMode::Login);
    let username = create_rw_signal(String::new());
    let password = create_rw_signal(String::new());
    let confirm = create_rw_signal(String::new());
    let (error, set_error) = create_signal(None::<String>);
    let (busy, set_busy) = create_signal(false);

    let submit = move || {
        if busy.get_untracked() {
            return;
        }
        set_error.set(None);
        set_busy.set(true);
        let current = mode.get_untracked();
        let (user, pass, again) = (username.get_untracked(), password.get_untracked(), confirm.get_untracked());
        spawn_local(async move {
            match application::authenticate(api(), current, &user, &pass, &again).await {
                Ok(AuthOutcome::SignedUp) => {
                    actions::show_toast(Toast::success("Sign up successful! Please log in."));
                    set_mode.set(AuthMode::Login);
                }
                Ok(AuthOutcome::LoggedIn(user)) => actions::login(user),
                Err(err) => set_error.set(Some(err.user_message())),
            }
            set_busy.set(false);
        });
    };
    let on_enter = move |ev: ev::KeyboardEvent| {
        if ev.key() == "Enter" {
            submit();
        }
    };
    let is_signup = move || mode.get() == AuthMode::Signup;

    view! {
        <div class="auth-page">
            <div class="card auth-card">
                <h2>{move || if is_signup() { "Sign Up" } else { "Log In" }}</h2>
                <label for="username">"Username"</label>
                <input
                    id="username"
                    placeholder="Enter a username"
                    prop:value=move || username.get()
                    on:input=move |ev| username.set(event_target_value(&ev))
                />
                <label for="password">"Password"</label>
                <input
                    id="password"
                    type="password"
                    placeholder="••••••••"
                    prop:value=move || password.get()
                    on:input=move |ev| password.set(event_target_value(&ev))
                    on:keydown=on_enter
                />
                <Show when=is_signup>
                    <label for="confirm-password">"Confirm Password"</label>
                    <input
                        id="confirm-password"
                        type="password"
                        placeholder="••••••••"
                        prop:value=move || confirm.get()
                        on:input=move |ev| confirm.set(event_target_value(&ev))
                        on:keydown=on_enter
                    />
                </Show>
                {move || error.get().map(|message| view! { <AlertBox title="Error" message=message error=true/> })}
                <button class="primary wide" disabled=move || busy.get() on:click=move |_| submit()>
                    {move || match (busy.get(), is_signup()) {
                        (true, _) => "Please wait...",
                        (false, true) => "Create Account",
                        (false, false) => "Log In",
                    }}
                </button>
                <button class="link" on:click=move |_| set_mode.update(|m| *m = m.toggled())>
                    {move || {
                        if is_signup() { "Already have an account? Log In" } else { "Don't have an account? Sign Up" }
                    }}
                </button>
                <div class="divider">"Or"</div>
                <button class="outline wide" on:click=|_| actions::login(User::guest())>
                    "Continue as Guest (Practice Mode)"
                </button>
            </div>
        </div>
    }
}
