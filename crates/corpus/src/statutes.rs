//! Statutory passages for the three supported acts.
//!
//! Order matters: the semantic index breaks distance ties by position here.

use crate::chunk::LegalChunk;
use crate::intent::Category;

struct Passage {
    id: &'static str,
    category: Category,
    section: &'static str,
    text: &'static str,
}

const PASSAGES: &[Passage] = &[
    Passage {
        id: "rti_scope_definition",
        category: Category::Rti,
        section: "Scope and Definitions",
        text: "RTI Act 2005, scope and who can file. Section 2(f) defines information as any material in any form: \
records, documents, memos, emails, opinions, advices, press releases, circulars, orders, logbooks, contracts, \
reports, samples, models and electronic data. Section 2(h) defines a public authority as any body established by \
the Constitution, Parliament, a State Legislature or a Government notification, including central and state \
departments, PSUs and government-aided institutions. Section 2(j): every citizen of India has the right to \
inspect records, obtain certified copies and take certified samples of material held by public authorities. \
Intelligence agencies listed in the Second Schedule are excluded except for allegations of corruption or human \
rights violations (Section 24).",
    },
    Passage {
        id: "rti_filing_procedure",
        category: Category::Rti,
        section: "Filing Procedure",
        text: "RTI Act 2005, how to file an application (Section 6). Write a plain application in English, Hindi or the \
official language of the area and address it to the Public Information Officer (PIO) of the department. \
Section 6(2): no reason or justification is required. Pay a fee of Rs. 10 by Indian Postal Order, demand draft, \
court fee stamp or cash; Below Poverty Line (BPL) card holders are fully exempt on attaching a copy of the card. \
Central government departments accept applications online at rtionline.gov.in, or by post or in person. \
Section 6(3): a PIO who receives an application meant for another authority must transfer it within 5 days and \
inform the applicant.",
    },
    Passage {
        id: "rti_timelines_deadlines",
        category: Category::Rti,
        section: "Timelines and Deadlines",
        text: "RTI Act 2005, timelines. Section 7(1): the PIO must provide the information within 30 days of receiving \
the application. Where the information concerns the life or liberty of a person it must be supplied within 48 \
hours; courts have read this to cover ration cards, MGNREGA wages, pension disbursement and police safety. \
Third-party information allows 40 days. Section 7(6): if the PIO misses the deadline the information must be \
provided free of charge. A PIO who does not respond within 30 days is deemed to have refused, and the applicant \
may file a First Appeal at once.",
    },
    Passage {
        id: "rti_fees_charges",
        category: Category::Rti,
        section: "Fees and Charges",
        text: "RTI Act 2005, fee structure. Application fee Rs. 10. BPL applicants pay nothing for the application or \
the information. Copies cost Rs. 2 per A4/A3 page and actual cost for larger sizes, samples or models; \
inspection of records costs Rs. 5 per hour after the first free hour. First Appeals and Second Appeals to the \
Central or State Information Commission are free. When the 30-day deadline is missed, all information is \
supplied free of cost. State governments notify their own fee rules.",
    },
    Passage {
        id: "rti_appeals_process",
        category: Category::Rti,
        section: "Appeals: First and Second",
        text: "RTI Act 2005, appeals. Section 19(1), First Appeal: file with the First Appellate Authority, an officer \
senior to the PIO in the same department, within 30 days of an unsatisfactory reply or of the deadline passing. \
The authority must decide within 30 days, extendable to 45. Section 19(3), Second Appeal: file with the Central \
Information Commission for central bodies or the State Information Commission for state bodies within 90 days of \
the first appellate order. Section 19(8) lets the Commission order disclosure and compensation. Section 20: the \
Commission can fine a defaulting PIO Rs. 250 per day of delay up to Rs. 25,000 and recommend disciplinary action.",
    },
    Passage {
        id: "rti_exemptions",
        category: Category::Rti,
        section: "Exemptions from Disclosure",
        text: "RTI Act 2005, exemptions (Section 8). Section 8(1)(a): sovereignty, security and strategic interests. \
8(1)(b): material a court has forbidden from publication. 8(1)(c): parliamentary privilege. 8(1)(d): commercial \
confidence and trade secrets. 8(1)(e): information held in a fiduciary relationship. 8(1)(g): information that \
would endanger a person's life. 8(1)(h): information that would impede an investigation or prosecution. \
8(1)(j): personal information with no public interest; the salary, assets and conduct of public servants remain \
disclosable. Section 8(2): exempt information must still be disclosed when public interest outweighs the harm. \
Section 11: third parties get notice before their information is released.",
    },
    Passage {
        id: "dv_definition_types",
        category: Category::DomesticViolence,
        section: "Definition and Types of Abuse",
        text: "Protection of Women from Domestic Violence Act 2005 (PWDVA), Section 3 defines domestic violence. \
Physical abuse: any act causing bodily pain, harm or danger to life such as hitting, slapping, kicking, pushing, \
burning or use of weapons. Sexual abuse: conduct of a sexual nature that humiliates, degrades or violates \
dignity. Verbal and emotional abuse: insults, ridicule, name-calling, threats of harm, threats to take away \
children, controlling behaviour and isolation from family. Economic abuse: depriving the woman of financial \
resources she is entitled to, forcing her out of the shared household, disposing of stridhan or property. \
Repeated dowry demands are domestic violence under Section 3, separately from the Dowry Prohibition Act 1961.",
    },
    Passage {
        id: "dv_who_can_file_officials",
        category: Category::DomesticViolence,
        section: "Who Can File and Key Officials",
        text: "PWDVA 2005, who can file. Section 2(a): an aggrieved person is any woman who is or has been in a \
domestic relationship with the respondent, including a wife, live-in partner, sister, mother or daughter. \
Section 2(q): the respondent is an adult member of the household, and relatives of the husband or partner. A \
complaint can be made by the woman, anyone on her behalf, a Protection Officer or the police. Section 9: the \
Protection Officer is appointed by the State Government and serves free of charge, preparing the Domestic \
Incident Report and arranging shelter and medical aid. Section 10: registered service providers can receive \
complaints. Section 12: any Judicial or Metropolitan Magistrate has jurisdiction and can be approached directly.",
    },
    Passage {
        id: "dv_dir_filing",
        category: Category::DomesticViolence,
        section: "Domestic Incident Report Filing",
        text: "PWDVA 2005, filing a Domestic Incident Report (DIR). Contact the Protection Officer at the district \
court, a police station or the District Legal Services Authority; the service is free. Section 9(b) obliges the \
Protection Officer to prepare the DIR in Form I. The DIR is filed with the Magistrate under Section 12, or the \
woman may file an application under Section 12(1) herself. Section 12(4): the Magistrate must fix the first \
hearing within 3 days. Section 12(5): proceedings should be disposed of within 60 days. Section 16: hearings may \
be held in camera. In an emergency call the Women Helpline 181 or Police 100; police must assist under Section 5.",
    },
    Passage {
        id: "dv_court_orders",
        category: Category::DomesticViolence,
        section: "Court Orders Available",
        text: "PWDVA 2005, orders the Magistrate can pass. Section 18 Protection Order: bars the respondent from \
committing violence, entering the woman's workplace, contacting her or alienating her assets and stridhan. \
Breach is an offence under Section 31 punishable with imprisonment up to 1 year, a fine up to Rs. 20,000, or \
both. Section 19 Residence Order: she cannot be dispossessed from the shared household whether or not she owns \
it, and the respondent may be directed to vacate it. Section 20 Monetary Relief: loss of earnings, medical \
expenses and maintenance for her and her children. Section 21 Custody Order: temporary custody of children. \
Section 22 Compensation: damages for injuries and emotional distress.",
    },
    Passage {
        id: "dv_criminal_remedies",
        category: Category::DomesticViolence,
        section: "Criminal Law Remedies",
        text: "Criminal remedies alongside the PWDVA. Section 498A IPC (Section 85 BNS 2023): cruelty by the husband or \
his relatives; cognizable and non-bailable, imprisonment up to 3 years and fine. Section 304B IPC (Section 80 \
BNS): dowry death within 7 years of marriage, minimum 7 years imprisonment. Sections 323 and 325 IPC (Sections \
115 and 117 BNS): simple and grievous hurt. Section 354 IPC (Section 74 BNS): assault to outrage modesty. \
Section 506 IPC (Section 351 BNS): criminal intimidation. Dowry Prohibition Act 1961, Section 4: demanding dowry \
carries at least 6 months imprisonment. Helplines: Women Helpline 181, Police 100, National Commission for \
Women, and free legal aid from the District Legal Services Authority.",
    },
    Passage {
        id: "divorce_eligibility_types",
        category: Category::Divorce,
        section: "Eligibility and Types of Divorce",
        text: "Hindu Marriage Act 1955, types of divorce. Section 13B mutual consent: both spouses agree and have lived \
separately for at least one year; both appear before the Family Court. Section 13 contested divorce: grounds \
include cruelty (13(1)(ia)), adultery (13(1)(i)), desertion for two years or more (13(1)(ib)), conversion, \
mental disorder and renunciation of the world. Section 28 of the Special Marriage Act 1954 provides mutual \
consent divorce for inter-faith marriages after one year of separation. Section 10A of the Divorce Act 1869 \
provides mutual consent divorce for Christian marriages after two years of separation.",
    },
    Passage {
        id: "divorce_procedure_steps",
        category: Category::Divorce,
        section: "Mutual Consent Procedure",
        text: "Section 13B Hindu Marriage Act 1955, mutual consent procedure. Both spouses must agree and must have \
lived separately for one year immediately before filing. Settle alimony, child custody and visitation, return \
of stridhan and division of property, ideally in a written memorandum of understanding. File a joint petition \
signed by both spouses in the Family Court where the marriage was solemnised, where the respondent lives, or \
where the parties last lived together. First Motion under Section 13B(1): both record statements on oath and a \
six-month cooling-off period begins. Second Motion under Section 13B(2) within 18 months confirms consent and \
the decree follows. Amardeep Singh v. Harveen Kaur (2017): the six-month period can be waived when settlement \
is complete and the marriage has irretrievably broken down.",
    },
    Passage {
        id: "divorce_alimony_maintenance",
        category: Category::Divorce,
        section: "Alimony and Maintenance",
        text: "Alimony and maintenance. Section 24 Hindu Marriage Act 1955: maintenance pendente lite for whichever \
spouse earns less, during the proceedings. Section 25: permanent alimony as a lump sum or periodic payment after \
the decree, considering the income, property and conduct of both parties, and open to revision when \
circumstances change. Section 125 CrPC (Section 144 BNSS 2023): a Magistrate can order monthly maintenance for a \
wife, children and parents, even before divorce. Stridhan, the jewellery and gifts given to the wife, is her \
absolute property (Pratibha Rani v. Suraj Kumar, 1985).",
    },
    Passage {
        id: "divorce_child_custody",
        category: Category::Divorce,
        section: "Child Custody",
        text: "Child custody on divorce. Section 26 Hindu Marriage Act 1955: the court may pass interim or permanent \
custody orders at any stage; the welfare of the child is paramount. The Guardians and Wards Act 1890 governs \
custody disputes. Mothers usually receive custody of children below five years; for older children the court \
weighs the child's preference, stability of home and each parent's capacity. The non-custodial parent normally \
receives visitation rights. Interim custody can be obtained from the Family Court within days of filing.",
    },
    Passage {
        id: "divorce_nri_special",
        category: Category::Divorce,
        section: "NRI Divorce and Special Situations",
        text: "Special divorce situations. Section 19 Hindu Marriage Act 1955: a petition can be filed in India even \
when one spouse lives abroad; that spouse may act through a power of attorney holder but must appear in person \
for the final hearing. Foreign divorce decrees are not automatically recognised in India. Instant triple talaq \
is abolished and a criminal offence under the Muslim Women (Protection of Rights on Marriage) Act 2019. The \
Dissolution of Muslim Marriages Act 1939 lets a wife seek divorce on grounds such as failure to maintain and \
cruelty; khula is wife-initiated divorce.",
    },
];

/// Materialize the full statutory corpus in insertion order.
pub fn statutory_corpus() -> Vec<LegalChunk> {
    PASSAGES
        .iter()
        .map(|p| LegalChunk::new(p.id, p.category, p.section, p.text))
        .collect()
}
