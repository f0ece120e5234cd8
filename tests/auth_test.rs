use interview_coach::{Anonymous, AuthGate, SharedToken, StaticToken};

/// 转换成 token 时 panic，用来在持有写锁时中毒
struct Exploding;

impl From<Exploding> for String {
    fn from(_: Exploding) -> String {
        panic!("token 生成失败");
    }
}

#[test]
fn test_static_and_anonymous_tokens() {
    assert_eq!(Anonymous.current_token(), None);
    assert_eq!(StaticToken::new(Some("  ".to_string())).current_token(), None);
    assert_eq!(
        StaticToken::new(Some("abc".to_string())).current_token(),
        Some("abc".to_string())
    );
}

#[test]
fn test_shared_token_login_logout() {
    let token = SharedToken::new();
    assert_eq!(token.current_token(), None);

    token.set("abc123");
    assert_eq!(token.clone().current_token(), Some("abc123".to_string()));

    token.clear();
    assert_eq!(token.current_token(), None);
}

#[test]
fn test_shared_token_survives_poisoned_lock() {
    let token = SharedToken::new();
    token.set("old");

    let poisoner = token.clone();
    let joined = std::thread::spawn(move || poisoner.set(Exploding)).join();
    assert!(joined.is_err());

    // 锁已中毒，读写仍然生效
    assert_eq!(token.current_token(), Some("old".to_string()));
    token.set("new");
    assert_eq!(token.current_token(), Some("new".to_string()));
    token.clear();
    assert_eq!(token.current_token(), None);
}
