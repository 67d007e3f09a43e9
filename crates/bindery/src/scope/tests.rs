use super::*;

#[test]
fn scopes_reach_only_longer_lived_tiers() {
	assert!(Scope::Function.can_reach(Scope::Thread));
	assert!(Scope::Function.can_reach(Scope::Process));
	assert!(Scope::Thread.can_reach(Scope::Process));

	assert!(!Scope::Thread.can_reach(Scope::Thread));
	assert!(!Scope::Process.can_reach(Scope::Thread));
	assert!(!Scope::Process.can_reach(Scope::Process));
}
