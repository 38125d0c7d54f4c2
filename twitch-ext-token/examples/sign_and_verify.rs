use std::env;

use twitch_ext_token::{
    create_claims, encode_secret, sign_claims, verify_token, Permissions, Role, TokenError,
};

fn main() -> Result<(), TokenError> {
    // Fall back to a throwaway secret so the example runs without a real extension
    let secret = env::var("EXT_SECRET").unwrap_or_else(|_| encode_secret(b"example-secret"));
    let owner_id = env::var("OWNER_ID").unwrap_or_else(|_| "example-owner".to_string());

    // Example 1: Claims for a broadcaster-scoped request
    println!("Example 1: Sign broadcaster claims");
    let claims = create_claims(
        &owner_id,
        "35851594",
        Some(Role::Broadcaster),
        Permissions::broadcast_send(),
    );
    let token = sign_claims(&claims, &secret)?;
    println!("Signed token: {}\n", token);

    // Example 2: Verify the token we just produced
    println!("Example 2: Verify token");
    let verified = verify_token(&token, &secret)?;
    println!("✅ Verified claims: {:?}\n", verified);

    // Example 3: Unscoped claims fall back to the "all" channel and external role
    println!("Example 3: Default scope");
    let claims = create_claims(&owner_id, "", None, Permissions::global_send());
    println!(
        "channel_id={} role={} expires_at={}",
        claims.channel_id, claims.role, claims.expires_at
    );

    Ok(())
}
