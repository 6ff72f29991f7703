//! Expression type to builder resolution.
//!
//! Registrations are keyed by the exact expression type. A lookup miss walks
//! the expression's parent chain, most specific first, and caches the first
//! match under the original concrete type. Builder instances are created on
//! first use, once per builder type, and shared afterwards.

use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use tracing::{debug, trace};

use crate::builder::{
    BetweenConditionBuilder, ConjunctionConditionBuilder, ExistsConditionBuilder,
    ExpressionBuilder, InConditionBuilder, NotConditionBuilder, PassThroughBuilder,
    QueryExpressionBuilder, RawExpressionBuilder, SimpleConditionBuilder, TypedValueBuilder,
};
use crate::dialect::Dialect;
use crate::error::{QueryError, Result};
use crate::expression::{Compiled, Expression, ExpressionInterface, TypedValue};
use crate::query::{
    BetweenCondition, ConjunctionCondition, ExistsCondition, InCondition, NotCondition, Query,
    SimpleCondition,
};

type BuilderFactory = Arc<dyn Fn(&Arc<dyn Dialect>) -> Arc<dyn ExpressionBuilder> + Send + Sync>;

#[derive(Clone)]
struct Registration {
    builder_type: TypeId,
    builder_name: &'static str,
    factory: BuilderFactory,
}

/// A cached resolution: the builder plus how many parent steps lead to the
/// registered ancestor.
#[derive(Clone)]
struct Resolution {
    builder: Arc<dyn ExpressionBuilder>,
    depth: usize,
}

/// Maps expression types to builders.
#[derive(Clone, Default)]
pub struct BuilderRegistry {
    registrations: HashMap<TypeId, Registration>,
    instances: DashMap<TypeId, Arc<dyn ExpressionBuilder>>,
    resolved: DashMap<TypeId, Resolution>,
}

impl fmt::Debug for BuilderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuilderRegistry")
            .field(
                "builders",
                &self
                    .registrations
                    .values()
                    .map(|r| r.builder_name)
                    .collect::<Vec<_>>(),
            )
            .field("resolved", &self.resolved.len())
            .finish()
    }
}

impl BuilderRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with the builders every dialect supports.
    ///
    /// JSON expressions are left out; dialects that store JSON register
    /// [`JsonExpressionBuilder`](crate::builder::JsonExpressionBuilder).
    #[must_use]
    pub fn with_core_builders() -> Self {
        let mut registry = Self::new();
        registry.register::<Expression, _, _>(RawExpressionBuilder::new);
        registry.register::<TypedValue, _, _>(TypedValueBuilder::new);
        registry.register::<Compiled, _, _>(PassThroughBuilder::new);
        registry.register::<Query, _, _>(QueryExpressionBuilder::new);
        registry.register::<SimpleCondition, _, _>(SimpleConditionBuilder::new);
        registry.register::<InCondition, _, _>(InConditionBuilder::new);
        registry.register::<BetweenCondition, _, _>(BetweenConditionBuilder::new);
        registry.register::<ConjunctionCondition, _, _>(ConjunctionConditionBuilder::new);
        registry.register::<NotCondition, _, _>(NotConditionBuilder::new);
        registry.register::<ExistsCondition, _, _>(ExistsConditionBuilder::new);
        registry
    }

    /// Registers the builder for expressions of type `E`.
    ///
    /// `factory` runs at most once per builder type, on first use. Registering
    /// replaces any previous builder for `E` and drops cached resolutions.
    pub fn register<E, B, F>(&mut self, factory: F)
    where
        E: ExpressionInterface,
        B: ExpressionBuilder + 'static,
        F: Fn(&Arc<dyn Dialect>) -> B + Send + Sync + 'static,
    {
        let builder_type = TypeId::of::<B>();
        let factory: BuilderFactory =
            Arc::new(move |dialect| Arc::new(factory(dialect)) as Arc<dyn ExpressionBuilder>);
        self.registrations.insert(
            TypeId::of::<E>(),
            Registration {
                builder_type,
                builder_name: std::any::type_name::<B>(),
                factory,
            },
        );
        self.instances.remove(&builder_type);
        self.resolved.clear();
    }

    /// Returns true if `E` has a builder of its own.
    #[must_use]
    pub fn is_registered<E: ExpressionInterface>(&self) -> bool {
        self.registrations.contains_key(&TypeId::of::<E>())
    }

    /// Finds the builder for `expression`.
    ///
    /// Returns the builder together with the view it must be handed: the
    /// expression itself, or the ancestor the builder was registered for.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::UnsupportedExpression`] if neither the type nor
    /// any ancestor has a builder.
    pub fn resolve<'e>(
        &self,
        expression: &'e dyn ExpressionInterface,
        dialect: &Arc<dyn Dialect>,
    ) -> Result<(Arc<dyn ExpressionBuilder>, &'e dyn ExpressionInterface)> {
        let type_id = expression.as_any().type_id();

        let cached = self.resolved.get(&type_id).map(|entry| entry.value().clone());
        if let Some(resolution) = cached {
            trace!(type_name = expression.type_name(), "builder cache hit");
            let view = ancestor(expression, resolution.depth).ok_or_else(|| {
                QueryError::UnsupportedExpression {
                    type_name: expression.type_name(),
                }
            })?;
            return Ok((resolution.builder, view));
        }

        let mut depth = 0;
        let mut current = Some(expression);
        while let Some(view) = current {
            if let Some(registration) = self.registrations.get(&view.as_any().type_id()) {
                let builder = self.instance(registration, dialect);
                debug!(
                    type_name = expression.type_name(),
                    resolved_as = view.type_name(),
                    builder = registration.builder_name,
                    depth,
                    "resolved expression builder"
                );
                self.resolved.insert(
                    type_id,
                    Resolution {
                        builder: Arc::clone(&builder),
                        depth,
                    },
                );
                return Ok((builder, view));
            }
            current = view.parent();
            depth += 1;
        }

        Err(QueryError::UnsupportedExpression {
            type_name: expression.type_name(),
        })
    }

    fn instance(
        &self,
        registration: &Registration,
        dialect: &Arc<dyn Dialect>,
    ) -> Arc<dyn ExpressionBuilder> {
        let existing = self
            .instances
            .get(&registration.builder_type)
            .map(|entry| Arc::clone(entry.value()));
        if let Some(builder) = existing {
            return builder;
        }

        // Two threads may both get here; the first insert wins.
        let builder = (registration.factory)(dialect);
        Arc::clone(
            self.instances
                .entry(registration.builder_type)
                .or_insert(builder)
                .value(),
        )
    }
}

fn ancestor(expression: &dyn ExpressionInterface, depth: usize) -> Option<&dyn ExpressionInterface> {
    let mut view = expression;
    for _ in 0..depth {
        view = view.parent()?;
    }
    Some(view)
}
