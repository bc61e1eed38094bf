//! Scene UI composition.

use showfloor_env::{Collaborator, UiTree};

/// Builds the scene's UI root from whichever SDK modules are present.
///
/// Called every frame by the renderer, possibly before the SDK client is
/// attached; that case renders nothing. Modules that exist but contribute
/// no panel are skipped.
pub fn compose_ui<C>(collaborator: Option<&C>) -> Option<UiTree>
where
    C: Collaborator + ?Sized,
{
    let collaborator = collaborator?;

    let guide = collaborator.guide().and_then(|g| g.component());
    let chat = collaborator.chat().and_then(|c| c.component());
    let admin = collaborator.admin_panel().and_then(|a| a.component());

    Some(UiTree {
        children: [guide, chat, admin].into_iter().flatten().collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FakeCollaborator;

    #[test]
    fn test_no_collaborator_renders_nothing() {
        assert_eq!(compose_ui::<FakeCollaborator>(None), None);
    }

    #[test]
    fn test_full_collaborator_orders_guide_chat_admin() {
        let collaborator = FakeCollaborator::full();
        let tree = compose_ui(Some(&collaborator)).unwrap();
        let names: Vec<_> = tree.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["guide", "chat", "admin"]);
    }

    #[test]
    fn test_missing_modules_are_skipped() {
        let collaborator = FakeCollaborator::full().without_admin();
        let tree = compose_ui(Some(&collaborator)).unwrap();
        assert_eq!(tree.children.len(), 2);

        let bare = FakeCollaborator::bare();
        assert!(compose_ui(Some(&bare)).unwrap().is_empty());
    }
}
