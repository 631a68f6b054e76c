//! Field classes
//!
//! Only the parts of field classes the metadata hierarchy relies on are
//! modelled: the type tag and the minimum alignment of structures.

use tracemeta_core::{check_alignment, handle_status, FieldClassType, MetaError, MetaResult};

use crate::object::{entity, Constness, Mutable};
use crate::user_attributes::impl_user_attributes;

entity! {
    /// Field class
    FieldClass, FieldClassConst => FieldClass
}

impl_user_attributes!(FieldClass);

impl<C: Constness> FieldClass<C> {
    pub fn field_type(&self) -> FieldClassType {
        self.engine().field_class_get_type(self.handle())
    }

    #[inline]
    pub fn is_structure(&self) -> bool {
        self.field_type().is_structure()
    }

    /// Fail with a type mismatch unless this is a structure field class
    pub(crate) fn ensure_structure(&self) -> MetaResult<()> {
        let field_type = self.field_type();
        if !field_type.is_structure() {
            return Err(MetaError::type_mismatch(
                FieldClassType::Structure.name(),
                field_type.name(),
            ));
        }
        Ok(())
    }

    /// Minimum alignment in bits of a structure field class
    pub fn minimum_alignment(&self) -> Option<u64> {
        self.is_structure().then(|| {
            self.engine()
                .field_class_structure_get_minimum_alignment(self.handle())
        })
    }
}

impl FieldClass<Mutable> {
    /// Set the minimum alignment of a structure field class; it must be a
    /// power of two
    pub fn set_minimum_alignment(&mut self, alignment: impl Into<i128>) -> MetaResult<()> {
        let alignment = check_alignment(alignment)?;
        self.ensure_structure()?;
        let status = self
            .engine()
            .field_class_structure_set_minimum_alignment(self.handle(), alignment);
        handle_status(
            status,
            Some("cannot set structure field class object's minimum alignment"),
        )
    }
}
