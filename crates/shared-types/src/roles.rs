//! # Actor Roles
//!
//! Market roles with their wire codes.
//!
//! ## Mailbox routing alias
//!
//! Messages for a `MeteredDataResponsible` are queued in the `GridOperator`
//! mailbox. That mapping lives in exactly one place,
//! [`ActorRole::for_actor_message_queue`], and every mailbox-resolution site
//! must call it. Role equality is never affected.

coded_enumeration! {
    /// Market role of an actor.
    pub struct ActorRole {
        METERING_POINT_ADMINISTRATOR = ("MeteringPointAdministrator", "DDZ"),
        ENERGY_SUPPLIER = ("EnergySupplier", "DDQ"),
        GRID_OPERATOR = ("GridOperator", "DDM"),
        METERED_DATA_ADMINISTRATOR = ("MeteredDataAdministrator", "DGL"),
        METERED_DATA_RESPONSIBLE = ("MeteredDataResponsible", "MDR"),
        BALANCE_RESPONSIBLE_PARTY = ("BalanceResponsibleParty", "DDK"),
        IMBALANCE_SETTLEMENT_RESPONSIBLE = ("ImbalanceSettlementResponsible", "DDX"),
        SYSTEM_OPERATOR = ("SystemOperator", "EZ"),
        DANISH_ENERGY_AGENCY = ("DanishEnergyAgency", "STS"),
        DELEGATED = ("Delegated", "DEL"),
    }
}

impl ActorRole {
    /// Role whose mailbox receives messages addressed to `self`.
    ///
    /// TODO: drop the MeteredDataResponsible alias once grid operators
    /// receive messages in their own MDR mailbox.
    #[must_use]
    pub fn for_actor_message_queue(&self) -> ActorRole {
        if *self == Self::METERED_DATA_RESPONSIBLE {
            Self::GRID_OPERATOR
        } else {
            self.clone()
        }
    }

    /// True for the role assigned to delegated submitters.
    #[must_use]
    pub fn is_delegated(&self) -> bool {
        *self == Self::DELEGATED
    }
}
