use serde::{Deserialize, Serialize};

use corpus::Intent;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelledUtterance {
    pub text: String,
    pub expected_intent: Intent,
    pub expected_kill_switch: bool,
}

impl LabelledUtterance {
    fn new(text: &str, expected_intent: Intent) -> Self {
        Self {
            text: text.to_string(),
            expected_intent,
            expected_kill_switch: !expected_intent.is_in_scope(),
        }
    }
}

pub fn get_test_set() -> Vec<LabelledUtterance> {
    use Intent::*;

    vec![
        // RTI
        LabelledUtterance::new("I want to file an RTI about my pension. My name is Ravi Kumar.", Rti),
        LabelledUtterance::new(
            "I filed an RTI application two months ago and the PIO has not replied. What can I do?",
            Rti,
        ),
        LabelledUtterance::new(
            "How do I get copies of the road repair contract from the municipal corporation?",
            Rti,
        ),
        LabelledUtterance::new("My first appeal was rejected, can I go to the information commission?", Rti),
        // Domestic violence
        LabelledUtterance::new(
            "My husband beats me every night and his mother takes away my salary.",
            DomesticViolence,
        ),
        LabelledUtterance::new(
            "My in-laws are demanding more dowry and threatening to throw me out of the house.",
            DomesticViolence,
        ),
        LabelledUtterance::new(
            "Can I get a protection order against my husband who keeps threatening me?",
            DomesticViolence,
        ),
        // Divorce
        LabelledUtterance::new(
            "My wife and I both want to separate peacefully. We have lived apart for two years.",
            Divorce,
        ),
        LabelledUtterance::new("How long does a mutual consent divorce take under the Hindu Marriage Act?", Divorce),
        LabelledUtterance::new(
            "We agreed on alimony and custody of our son. How do we file a joint divorce petition?",
            Divorce,
        ),
        // Out of scope
        LabelledUtterance::new("What's a good restaurant nearby?", OutOfScope),
        LabelledUtterance::new("My landlord refuses to return my security deposit.", OutOfScope),
        LabelledUtterance::new("How do I file my income tax return?", OutOfScope),
        LabelledUtterance::new("hello", OutOfScope),
    ]
}
