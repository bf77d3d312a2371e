/// Number of damage severity classes the network distinguishes.
pub const NUM_CLASSES: usize = 5;

/// Damage severity of a photographed QR code, from untouched to unreadable.
///
/// The discriminant order is load-bearing: it matches the output layer of the
/// trained network, so class id `i` is always logit/probability index `i`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DamageClass {
    Pristine = 0,
    Mild     = 1,
    Moderate = 2,
    Heavy    = 3,
    Severe   = 4,
}

impl DamageClass {
    /// All classes in id order.
    pub const ALL: [DamageClass; NUM_CLASSES] = [
        DamageClass::Pristine,
        DamageClass::Mild,
        DamageClass::Moderate,
        DamageClass::Heavy,
        DamageClass::Severe,
    ];

    pub fn id(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            DamageClass::Pristine => "Pristine",
            DamageClass::Mild     => "Mild",
            DamageClass::Moderate => "Moderate",
            DamageClass::Heavy    => "Heavy",
            DamageClass::Severe   => "Severe",
        }
    }

    pub fn from_id(id: usize) -> Option<DamageClass> {
        DamageClass::ALL.get(id).copied()
    }
}

impl std::fmt::Display for DamageClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
