use crate::record::Validatable;

///
/// RelationKind
///
/// Classification of a loaded relation, supplied by the record when it
/// describes its relations. The kind decides foreign-key backfill direction
/// and error-path naming during traversal.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RelationKind {
    /// This record holds the foreign key pointing at the child.
    BelongsTo,
    /// One child holds a foreign key pointing back at this record.
    HasOne,
    /// Many children hold foreign keys pointing back at this record.
    HasMany,
    /// Linked through a join table; no foreign key on either side to fill.
    ManyToMany,
}

impl RelationKind {
    #[must_use]
    pub const fn is_to_many(self) -> bool {
        matches!(self, Self::HasMany | Self::ManyToMany)
    }
}

///
/// RelationModel
///
/// Static description of one relation. For `BelongsTo` the foreign key lives
/// on the parent and `owner_key` names the child column it references; for
/// `HasOne`/`HasMany` the foreign key lives on the child; `ManyToMany` uses
/// neither.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RelationModel {
    pub name: &'static str,
    pub kind: RelationKind,
    pub foreign_key: &'static str,
    pub owner_key: &'static str,
}

impl RelationModel {
    #[must_use]
    pub const fn belongs_to(
        name: &'static str,
        foreign_key: &'static str,
        owner_key: &'static str,
    ) -> Self {
        Self {
            name,
            kind: RelationKind::BelongsTo,
            foreign_key,
            owner_key,
        }
    }

    #[must_use]
    pub const fn has_one(name: &'static str, foreign_key: &'static str) -> Self {
        Self {
            name,
            kind: RelationKind::HasOne,
            foreign_key,
            owner_key: "",
        }
    }

    #[must_use]
    pub const fn has_many(name: &'static str, foreign_key: &'static str) -> Self {
        Self {
            name,
            kind: RelationKind::HasMany,
            foreign_key,
            owner_key: "",
        }
    }

    #[must_use]
    pub const fn many_to_many(name: &'static str) -> Self {
        Self {
            name,
            kind: RelationKind::ManyToMany,
            foreign_key: "",
            owner_key: "",
        }
    }

    /// Error-path segment for one item of a to-many relation: `name[index]`.
    /// Child field names are appended after a `.` separator.
    #[must_use]
    pub fn indexed_name(&self, index: usize) -> String {
        format!("{}[{index}]", self.name)
    }
}

///
/// RelationTarget
///
/// The resolved, already-loaded object(s) behind a relation.
///

pub enum RelationTarget<'a> {
    One(&'a mut dyn Validatable),
    Many(Vec<&'a mut dyn Validatable>),
}

///
/// LoadedRelation
///
/// One loaded relation as handed out by
/// [`Validatable::loaded_relations_mut`]: its description plus mutable access
/// to its target record(s).
///

pub struct LoadedRelation<'a> {
    pub model: RelationModel,
    pub target: RelationTarget<'a>,
}
