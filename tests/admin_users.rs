//! User-role bindings as seen through the admin facade.

mod common;

use anyhow::Result;
use serde_json::json;

use common::*;
use rolegate::{settle, AdminPolicy, PrivilegeSpec, RoleSpec};

#[tokio::test]
async fn query_users_by_role_follows_grants_and_drops() -> Result<()> {
    let (_store, client) = connect(config(false));
    let policy = AdminPolicy::default();
    for name in ["readers", "writers"] {
        client.create_role(RoleSpec::new(name, vec![PrivilegeSpec::scoped(10, "test", "")]), &policy).await?;
    }
    client.execute(&json!({"op": "create_user", "user": "alice", "roles": ["readers"]})).await?;
    client.execute(&json!({"op": "create_user", "user": "bob", "roles": ["readers", "writers"]})).await?;

    let c = &client;
    let users = settle::until(&settle_policy(), move || async move {
        c.query_users_by_role("readers").await.ok().filter(|u| u.len() == 2)
    })
    .await?;
    assert_eq!(users, vec!["alice", "bob"]);

    client.drop_role("readers", &policy).await?;
    settle_user_roles(&client, "alice", &[]).await?;
    settle_user_roles(&client, "bob", &["writers"]).await?;
    assert!(client.query_users_by_role("readers").await?.is_empty());
    assert_eq!(client.execute(&json!({"op": "query_users_by_role", "role": "writers"})).await?, json!(["bob"]));
    Ok(())
}

#[tokio::test]
async fn grant_and_revoke() -> Result<()> {
    let (_store, client) = connect(config(false));
    let policy = AdminPolicy::default();
    client.create_role(RoleSpec::new("r1", vec![PrivilegeSpec::new(0)]), &policy).await?;
    client.create_role(RoleSpec::new("r2", vec![PrivilegeSpec::new(1)]), &policy).await?;
    client.create_user("u", vec![], &policy).await?;
    settle_user_roles(&client, "u", &[]).await?;

    client.grant_roles("u", vec!["r2".into(), "r1".into()], &policy).await?;
    settle_user_roles(&client, "u", &["r2", "r1"]).await?;

    client.execute(&json!({"op": "revoke_roles", "user": "u", "roles": ["r2"]})).await?;
    settle_user_roles(&client, "u", &["r1"]).await?;
    assert_eq!(client.execute(&json!({"op": "query_user", "user": "u"})).await?, json!(["r1"]));
    Ok(())
}

#[tokio::test]
async fn binding_errors() -> Result<()> {
    let (_store, client) = connect(config(false));
    let policy = AdminPolicy::default();
    client.create_role(RoleSpec::new("r", vec![PrivilegeSpec::new(0)]), &policy).await?;
    expect_code(client.create_user("u", vec!["missing".into()], &policy).await, 70);
    client.create_user("u", vec!["r".into()], &policy).await?;
    expect_code(client.create_user("u", vec![], &policy).await, 61);
    expect_code(client.grant_roles("nobody", vec!["r".into()], &policy).await, 60);
    expect_code(client.drop_user("nobody", &policy).await, 60);
    expect_code(client.create_user(&"u".repeat(64), vec![], &policy).await, 60);
    expect_code(client.execute(&json!({"op": "create_user", "user": "v", "roles": [1]})).await, -2);
    Ok(())
}

#[tokio::test]
async fn dropped_user_disappears() -> Result<()> {
    let (_store, client) = connect(config(false));
    let policy = AdminPolicy::default();
    client.create_role(RoleSpec::new("r", vec![PrivilegeSpec::new(0)]), &policy).await?;
    client.create_user("u", vec!["r".into()], &policy).await?;
    settle_user_roles(&client, "u", &["r"]).await?;
    client.execute(&json!({"op": "drop_user", "user": "u"})).await?;
    let c = &client;
    settle::until(&settle_policy(), move || async move { c.query_user("u").await.err().filter(|e| e.code() == 60) }).await?;
    assert!(client.query_users_by_role("r").await?.is_empty());
    Ok(())
}
