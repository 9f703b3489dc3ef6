//! Call-scoped key contexts
//!
//! A [`KeyContext`] is an immutable chain of nodes. Attaching key material
//! produces a child context and leaves the parent untouched, so one
//! background context can seed any number of concurrent sign or verify
//! calls, each holding its own child.

use crate::error::Result;
use crate::material::KeyMaterial;
use std::sync::Arc;

#[derive(Debug)]
struct Node {
    material: KeyMaterial,
    parent: Option<Arc<Node>>,
}

/// Immutable context carrying at most one [`KeyMaterial`] per level
#[derive(Debug, Clone, Default)]
pub struct KeyContext {
    head: Option<Arc<Node>>,
}

impl KeyContext {
    /// Empty root context
    #[must_use]
    pub fn background() -> Self {
        Self::default()
    }

    /// Derive a child context holding `material`.
    ///
    /// A missing public key is derived from the private key before the
    /// material is stored.
    ///
    /// # Errors
    ///
    /// Returns `InvalidKey` if the public key is missing and cannot be derived.
    pub fn attach(&self, material: KeyMaterial) -> Result<Self> {
        let material = material.with_derived_public_key()?;
        tracing::debug!(alg = %material.variant(), "attached key material to context");
        Ok(Self {
            head: Some(Arc::new(Node {
                material,
                parent: self.head.clone(),
            })),
        })
    }

    /// Nearest key material on this context chain
    #[must_use]
    pub fn lookup(&self) -> Option<&KeyMaterial> {
        self.head.as_deref().map(|node| &node.material)
    }

    /// Parent context, or `None` at the root
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        self.head.as_ref().map(|node| Self {
            head: node.parent.clone(),
        })
    }

    /// Number of attached levels above the root
    #[must_use]
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut cursor = self.head.as_deref();
        while let Some(node) = cursor {
            depth += 1;
            cursor = node.parent.as_deref();
        }
        depth
    }
}

/// Derive a child of `parent` holding `material`. See [`KeyContext::attach`].
///
/// # Errors
///
/// Returns `InvalidKey` if the public key is missing and cannot be derived.
pub fn attach(parent: &KeyContext, material: KeyMaterial) -> Result<KeyContext> {
    parent.attach(material)
}

/// Key material attached to `context`, if any. See [`KeyContext::lookup`].
#[must_use]
pub fn lookup(context: &KeyContext) -> Option<&KeyMaterial> {
    context.lookup()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::MlDsaVariant;
    use crate::keys::PrivateKey;

    #[test]
    fn background_has_no_material() {
        let ctx = KeyContext::background();
        assert!(lookup(&ctx).is_none());
        assert_eq!(ctx.depth(), 0);
        assert!(ctx.parent().is_none());
    }

    #[test]
    fn attach_leaves_parent_untouched() {
        let parent = KeyContext::background();
        let child = attach(
            &parent,
            KeyMaterial::from_private(PrivateKey::generate(MlDsaVariant::MlDsa44)),
        );
        let Ok(child) = child else {
            panic!("attach generated key");
        };
        assert!(parent.lookup().is_none());
        assert!(child.lookup().is_some());
        assert_eq!(child.depth(), 1);
    }

    #[test]
    fn attach_derives_public_key() {
        let sk = PrivateKey::generate(MlDsaVariant::MlDsa65);
        let expected = sk.public_key().cloned();
        let ctx = KeyContext::background().attach(KeyMaterial::from_private(sk));
        let public = ctx
            .ok()
            .and_then(|c| c.lookup().and_then(|m| m.public_key().cloned()));
        assert_eq!(public, expected);
    }

    #[test]
    fn nearest_material_wins() {
        let first = PrivateKey::generate(MlDsaVariant::MlDsa44);
        let second = PrivateKey::generate(MlDsaVariant::MlDsa65);
        let ctx = KeyContext::background()
            .attach(KeyMaterial::from_private(first))
            .and_then(|c| c.attach(KeyMaterial::from_private(second)));
        let Ok(ctx) = ctx else {
            panic!("attach generated keys");
        };
        assert_eq!(ctx.lookup().map(KeyMaterial::variant), Some(MlDsaVariant::MlDsa65));
        assert_eq!(
            ctx.parent().and_then(|p| p.lookup().map(KeyMaterial::variant)),
            Some(MlDsaVariant::MlDsa44)
        );
    }

    #[test]
    fn context_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<KeyContext>();
    }
}
