//! The `users` entity backing authentication and the outbound-mail
//! configuration.
//!
//! The mail password is stored encrypted ([`crate::CredentialCipher`]); it is
//! decrypted only on the notification path, immediately before dispatch.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub username: String,
    pub password: String,
    /// Venue display name, used in the confirmation mail subject.
    pub venue_name: Option<String>,
    /// Outbound mail address; mail is skipped when unset.
    pub mail_address: Option<String>,
    /// Encrypted mail password blob, base64(nonce ‖ ciphertext).
    pub mail_password_enc: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
