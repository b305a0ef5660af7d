use serde::Serialize;

use corpus::Category;

/// Shape of a field's value. `Text` and `Flag` are scalars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueShape {
    Text,
    Flag,
    /// Array of strings, optionally restricted to `FieldSpec::choices`.
    List,
    /// Array of `{name, age}` style records.
    Nested,
}

#[derive(Debug, Clone, Serialize)]
pub struct FieldSpec {
    pub id: &'static str,
    pub label: &'static str,
    pub question: &'static str,
    pub required: bool,
    pub shape: ValueShape,
    /// Identifiers, dates and witnesses: a value is only accepted when the
    /// user's own words contain it.
    pub grounded: bool,
    pub choices: &'static [&'static str],
}

impl FieldSpec {
    const fn new(id: &'static str, label: &'static str, question: &'static str) -> Self {
        Self {
            id,
            label,
            question,
            required: true,
            shape: ValueShape::Text,
            grounded: false,
            choices: &[],
        }
    }

    const fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    const fn grounded(mut self) -> Self {
        self.grounded = true;
        self
    }

    const fn shape(mut self, shape: ValueShape) -> Self {
        self.shape = shape;
        self
    }

    const fn choices(mut self, choices: &'static [&'static str]) -> Self {
        self.shape = ValueShape::List;
        self.choices = choices;
        self
    }

    /// JSON type hint used in the extraction prompt.
    pub fn type_hint(&self) -> String {
        match self.shape {
            ValueShape::Text => "string|null".to_string(),
            ValueShape::Flag => "boolean|null".to_string(),
            ValueShape::List if self.choices.is_empty() => "array of strings".to_string(),
            ValueShape::List => format!(
                "array of strings from [{}]",
                self.choices
                    .iter()
                    .map(|c| format!("\"{}\"", c))
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
            ValueShape::Nested => "array of {\"name\": string, \"age\": string}".to_string(),
        }
    }
}

/// Fixed, ordered set of form fields for one category.
#[derive(Debug, Serialize)]
pub struct FieldSchema {
    pub category: Category,
    pub title: &'static str,
    pub fields: &'static [FieldSpec],
}

impl FieldSchema {
    pub fn for_category(category: Category) -> &'static FieldSchema {
        match category {
            Category::Rti => &RTI_SCHEMA,
            Category::DomesticViolence => &DV_SCHEMA,
            Category::Divorce => &DIVORCE_SCHEMA,
        }
    }

    pub fn field(&self, id: &str) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|f| f.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.field(id).is_some()
    }

    pub fn required(&self) -> impl Iterator<Item = &'static FieldSpec> {
        self.fields.iter().filter(|f| f.required)
    }
}

const VIOLENCE_KINDS: &[&str] = &["Physical", "Sexual", "Verbal", "Emotional", "Economic", "Dowry"];

static RTI_SCHEMA: FieldSchema = FieldSchema {
    category: Category::Rti,
    title: "Application under Section 6(1) of the Right to Information Act, 2005",
    fields: &[
        FieldSpec::new("name", "Applicant name", "What is your full name?").grounded(),
        FieldSpec::new("address", "Postal address", "What is your complete postal address?"),
        FieldSpec::new("phone", "Phone", "What is your phone number?").grounded(),
        FieldSpec::new("email", "Email", "What is your email address?").grounded().optional(),
        FieldSpec::new(
            "bpl_status",
            "BPL card holder",
            "Do you hold a BPL (Below Poverty Line) card? BPL card holders are exempt from the Rs. 10 fee.",
        ),
        FieldSpec::new(
            "department_name",
            "Public authority",
            "Which government department or office are you requesting information from?",
        ),
        FieldSpec::new(
            "department_address",
            "Public authority address",
            "What is the address of that department or office?",
        ),
        FieldSpec::new(
            "pio_name",
            "Public Information Officer",
            "Do you know the name of the Public Information Officer (PIO)?",
        )
        .grounded()
        .optional(),
        FieldSpec::new(
            "information_requested",
            "Information requested",
            "What specific information do you want from the government?",
        ),
        FieldSpec::new(
            "time_period",
            "Period",
            "For what time period do you want this information? (e.g. April 2023 to March 2024)",
        ),
        FieldSpec::new(
            "format_required",
            "Format",
            "In what format do you want the information? (e.g. certified copies, inspection of records)",
        ),
        FieldSpec::new(
            "fee_payment_mode",
            "Fee payment",
            "How will you pay the Rs. 10 fee? (court fee stamp, Indian Postal Order, demand draft, or online)",
        ),
    ],
};

static DV_SCHEMA: FieldSchema = FieldSchema {
    category: Category::DomesticViolence,
    title: "Complaint under Section 12 of the Protection of Women from Domestic Violence Act, 2005",
    fields: &[
        FieldSpec::new("complainant_name", "Aggrieved person", "What is your full name?").grounded(),
        FieldSpec::new("complainant_age", "Age", "What is your age?").grounded(),
        FieldSpec::new(
            "complainant_address",
            "Address",
            "What is your current address (a safe address where you can receive letters)?",
        ),
        FieldSpec::new("complainant_phone", "Phone", "What is your phone number?").grounded(),
        FieldSpec::new(
            "respondent_name",
            "Respondent",
            "What is the full name of the person committing the violence?",
        )
        .grounded(),
        FieldSpec::new(
            "respondent_relation",
            "Relation to respondent",
            "What is their relation to you? (e.g. husband, father-in-law, mother-in-law)",
        ),
        FieldSpec::new(
            "respondent_address",
            "Respondent address",
            "What is the respondent's current address?",
        ),
        FieldSpec::new(
            "nature_of_violence",
            "Nature of violence",
            "What kind of violence have you faced? (physical, sexual, verbal, emotional, economic, dowry harassment)",
        )
        .choices(VIOLENCE_KINDS),
        FieldSpec::new(
            "incident_date",
            "Date of latest incident",
            "When did the most recent incident happen? (date or approximate time)",
        )
        .grounded(),
        FieldSpec::new(
            "incident_description",
            "Incident description",
            "Please describe what happened in your own words.",
        ),
        FieldSpec::new(
            "witnesses",
            "Witnesses",
            "Did anyone witness the violence? If so, please give their names and contact details.",
        )
        .grounded(),
        FieldSpec::new("children", "Children", "Do you have children? Please give their names and ages.")
            .shape(ValueShape::Nested)
            .optional(),
        FieldSpec::new("children_text", "Children (notes)", "Anything else about your children?").optional(),
        FieldSpec::new(
            "relief_protection",
            "Protection order sought",
            "Do you want a protection order against the respondent?",
        )
        .shape(ValueShape::Flag)
        .optional(),
        FieldSpec::new(
            "relief_residence",
            "Residence order sought",
            "Do you want a residence order to stay in the shared household?",
        )
        .shape(ValueShape::Flag)
        .optional(),
        FieldSpec::new(
            "relief_monetary_amount",
            "Monetary relief",
            "Are you seeking monetary relief? If yes, how much do you need for medical expenses, rent or maintenance?",
        ),
        FieldSpec::new(
            "relief_custody",
            "Custody order sought",
            "Do you want temporary custody of your children?",
        )
        .shape(ValueShape::Flag)
        .optional(),
    ],
};

static DIVORCE_SCHEMA: FieldSchema = FieldSchema {
    category: Category::Divorce,
    title: "Joint petition for divorce by mutual consent under Section 13B of the Hindu Marriage Act, 1955",
    fields: &[
        FieldSpec::new(
            "petitioner1_name",
            "Petitioner 1 (husband)",
            "What is the full name of the first petitioner (husband)?",
        )
        .grounded(),
        FieldSpec::new("petitioner1_age", "Petitioner 1 age", "What is the age of the first petitioner?").grounded(),
        FieldSpec::new(
            "petitioner1_address",
            "Petitioner 1 address",
            "What is the current address of the first petitioner?",
        ),
        FieldSpec::new(
            "petitioner1_occupation",
            "Petitioner 1 occupation",
            "What is the occupation of the first petitioner?",
        ),
        FieldSpec::new(
            "petitioner2_name",
            "Petitioner 2 (wife)",
            "What is the full name of the second petitioner (wife)?",
        )
        .grounded(),
        FieldSpec::new("petitioner2_age", "Petitioner 2 age", "What is the age of the second petitioner?").grounded(),
        FieldSpec::new(
            "petitioner2_address",
            "Petitioner 2 address",
            "What is the current address of the second petitioner?",
        ),
        FieldSpec::new(
            "petitioner2_occupation",
            "Petitioner 2 occupation",
            "What is the occupation of the second petitioner?",
        ),
        FieldSpec::new("marriage_date", "Date of marriage", "When were you married?").grounded(),
        FieldSpec::new("marriage_place", "Place of marriage", "Where were you married? (city or town)"),
        FieldSpec::new(
            "marriage_registration_number",
            "Marriage registration number",
            "Do you have a marriage registration number?",
        )
        .optional(),
        FieldSpec::new("separation_date", "Living separately since", "Since when have you been living separately?")
            .grounded(),
        FieldSpec::new(
            "separation_address",
            "Current residences",
            "Where is each of you living now?",
        ),
        FieldSpec::new("children", "Children", "Do you have children? Please give their names and ages.")
            .shape(ValueShape::Nested)
            .optional(),
        FieldSpec::new("children_text", "Children (notes)", "Anything else about your children?").optional(),
        FieldSpec::new(
            "alimony_amount",
            "Alimony amount",
            "Have you agreed on an alimony or maintenance amount? If yes, how much?",
        ),
        FieldSpec::new(
            "alimony_terms",
            "Alimony terms",
            "What are the payment terms for alimony? (e.g. Rs. 5000 per month, or a one-time settlement)",
        ),
        FieldSpec::new(
            "custody_arrangement",
            "Custody arrangement",
            "What child custody arrangement have you agreed on?",
        ),
        FieldSpec::new(
            "stridhan_settled",
            "Stridhan settled",
            "Has the stridhan (jewellery, gifts) been returned or settled? (yes / no / not applicable)",
        ),
        FieldSpec::new(
            "property_settled",
            "Property settled",
            "Has any jointly held property been divided or settled? (yes / no / not applicable)",
        ),
    ],
};
