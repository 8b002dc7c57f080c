//! Concrete coded sets used by market documents.

coded_enumeration! {
    /// Coded purpose of a transaction.
    pub struct BusinessReason {
        PERIODIC_METERING = ("PeriodicMetering", "E23"),
        PRELIMINARY_AGGREGATION = ("PreliminaryAggregation", "D03"),
        BALANCE_FIXING = ("BalanceFixing", "D04"),
        WHOLESALE_FIXING = ("WholesaleFixing", "D05"),
        CORRECTION = ("Correction", "D32"),
    }
}

coded_enumeration! {
    pub struct MeteringPointType {
        CONSUMPTION = ("Consumption", "E17"),
        PRODUCTION = ("Production", "E18"),
        EXCHANGE = ("Exchange", "E20"),
    }
}

coded_enumeration! {
    pub struct SettlementMethod {
        FLEX = ("Flex", "D01"),
        NON_PROFILED = ("NonProfiled", "E02"),
    }
}

coded_enumeration! {
    /// Which correction run a wholesale or correction request targets.
    pub struct SettlementVersion {
        FIRST_CORRECTION = ("FirstCorrection", "D01"),
        SECOND_CORRECTION = ("SecondCorrection", "D02"),
        THIRD_CORRECTION = ("ThirdCorrection", "D03"),
    }
}

coded_enumeration! {
    /// Business process a delegation or process instance belongs to.
    pub struct ProcessType {
        REQUEST_ENERGY_RESULTS = ("RequestEnergyResults", "RER"),
        REQUEST_WHOLESALE_RESULTS = ("RequestWholesaleResults", "RWR"),
        SEND_MEASUREMENTS = ("SendMeasurements", "SMD"),
    }
}

coded_enumeration! {
    /// Document types the hub accepts from actors.
    pub struct IncomingDocumentType {
        REQUEST_AGGREGATED_MEASURE_DATA = ("RequestAggregatedMeasureData", "E74"),
        REQUEST_WHOLESALE_SETTLEMENT = ("RequestWholesaleSettlement", "D21"),
        NOTIFY_VALIDATED_MEASURE_DATA = ("NotifyValidatedMeasureData", "E66"),
    }
}

impl IncomingDocumentType {
    /// The process a document of this type starts.
    #[must_use]
    pub fn process_type(&self) -> ProcessType {
        if *self == Self::REQUEST_WHOLESALE_SETTLEMENT {
            ProcessType::REQUEST_WHOLESALE_RESULTS
        } else if *self == Self::NOTIFY_VALIDATED_MEASURE_DATA {
            ProcessType::SEND_MEASUREMENTS
        } else {
            ProcessType::REQUEST_ENERGY_RESULTS
        }
    }
}

coded_enumeration! {
    /// Wire format of a document. `Xml` and `Json` are CIM; `Ebix` is the
    /// legacy dialect.
    pub struct DocumentFormat {
        XML = ("Xml", "XML"),
        JSON = ("Json", "JSON"),
        EBIX = ("Ebix", "EBIX"),
    }
}

impl DocumentFormat {
    #[must_use]
    pub fn is_legacy(&self) -> bool {
        *self == Self::EBIX
    }
}

coded_enumeration! {
    /// Time series resolution. Open set: newer resolutions map to an
    /// unknown sentinel instead of failing.
    pub struct Resolution: unknown {
        QUARTER_HOURLY = ("QuarterHourly", "PT15M"),
        HOURLY = ("Hourly", "PT1H"),
        DAILY = ("Daily", "P1D"),
        MONTHLY = ("Monthly", "P1M"),
    }
}

coded_enumeration! {
    /// Quantity unit. Codes the hub never emits map to an unused sentinel.
    pub struct MeasurementUnit: unused {
        KILOWATT_HOUR = ("KilowattHour", "KWH"),
        MEGAWATT_HOUR = ("MegawattHour", "MWH"),
        KILOVAR_HOUR = ("KiloVarHour", "K3"),
    }
}
