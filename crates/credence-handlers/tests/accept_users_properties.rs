// SPDX-FileCopyrightText: 2026 Credence Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Property and concurrency tests for the backing-map handler.

use std::collections::HashMap;
use std::sync::Arc;

use credence_core::{
    AuthenticationContext, AuthenticationHandler, Credential, ErrorKind,
    UsernamePasswordCredential,
};
use credence_handlers::AcceptUsersHandler;
use proptest::prelude::*;

fn users() -> HashMap<String, String> {
    HashMap::from([
        ("scott".to_string(), "rutgers".to_string()),
        ("dima".to_string(), "javarules".to_string()),
        ("bill".to_string(), "thisisAwesoME".to_string()),
        ("brian".to_string(), "t\u{e4}st".to_string()),
    ])
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("runtime")
}

proptest! {
    #[test]
    fn unknown_usernames_are_account_not_found(username in "[a-zA-Z0-9_.@-]{1,24}", password in ".{0,16}") {
        prop_assume!(!users().contains_key(&username));
        let handler = AcceptUsersHandler::new("accept-users", users());
        let credential = Credential::username_password(username.clone(), password);

        let err = runtime()
            .block_on(handler.authenticate(&credential, &AuthenticationContext::new()))
            .unwrap_err();
        prop_assert_eq!(err.kind, ErrorKind::AccountNotFound);
        prop_assert_eq!(err.message, format!("{username} not found in backing map."));
    }

    #[test]
    fn null_username_ignores_password(password in proptest::option::of(".{0,16}")) {
        let handler = AcceptUsersHandler::new("accept-users", users());
        let credential: Credential = UsernamePasswordCredential::from_parts(None, password).into();

        let err = runtime()
            .block_on(handler.authenticate(&credential, &AuthenticationContext::new()))
            .unwrap_err();
        prop_assert_eq!(err.kind, ErrorKind::AccountNotFound);
        prop_assert_eq!(err.message, "Username is null.");
    }

    #[test]
    fn exact_password_resolves_username(password in "\\PC{1,24}") {
        let mut table = users();
        table.insert("prop-user".to_string(), password.clone());
        let handler = AcceptUsersHandler::new("accept-users", table);
        let credential = Credential::username_password("prop-user", password);

        let principal = runtime()
            .block_on(handler.authenticate(&credential, &AuthenticationContext::new()))
            .unwrap();
        prop_assert_eq!(principal.id(), "prop-user");
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_attempts_match_sequential_results() {
    let mut table = HashMap::new();
    for i in 0..100 {
        table.insert(format!("user{i}"), format!("secret{i}"));
    }
    let handler = Arc::new(AcceptUsersHandler::new("accept-users", table));

    // Every third attempt uses a wrong password, every fifth an unknown user.
    let attempt = |i: usize| -> (String, String) {
        let username = if i % 5 == 0 {
            format!("ghost{i}")
        } else {
            format!("user{i}")
        };
        let password = if i % 3 == 0 {
            "wrong".to_string()
        } else {
            format!("secret{i}")
        };
        (username, password)
    };

    let mut sequential = Vec::new();
    for i in 0..100 {
        let (u, p) = attempt(i);
        let result = handler
            .authenticate(&Credential::username_password(u, p), &AuthenticationContext::new())
            .await
            .map(|principal| principal.id().to_string())
            .map_err(|e| (e.kind, e.message));
        sequential.push(result);
    }

    let mut tasks = Vec::new();
    for i in 0..100 {
        let handler = Arc::clone(&handler);
        let (u, p) = attempt(i);
        tasks.push(tokio::spawn(async move {
            handler
                .authenticate(&Credential::username_password(u, p), &AuthenticationContext::new())
                .await
                .map(|principal| principal.id().to_string())
                .map_err(|e| (e.kind, e.message))
        }));
    }

    let mut concurrent = Vec::new();
    for task in tasks {
        concurrent.push(task.await.unwrap());
    }

    assert_eq!(sequential, concurrent);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn reload_during_reads_never_mixes_tables() {
    let old: HashMap<String, String> = (0..50)
        .map(|i| (format!("old{i}"), "pw".to_string()))
        .collect();
    let new: HashMap<String, String> = (0..50)
        .map(|i| (format!("new{i}"), "pw".to_string()))
        .collect();
    let handler = Arc::new(AcceptUsersHandler::new("accept-users", old.clone()));

    let reader = {
        let handler = Arc::clone(&handler);
        tokio::spawn(async move {
            for round in 0..200 {
                let count = handler.user_count();
                assert_eq!(count, 50, "round {round} saw a partial table");
                tokio::task::yield_now().await;
            }
        })
    };

    for round in 0..50 {
        let next = if round % 2 == 0 { new.clone() } else { old.clone() };
        handler.reload_users(next);
        tokio::task::yield_now().await;
    }

    reader.await.unwrap();
}
