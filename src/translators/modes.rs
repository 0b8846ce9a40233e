//! Tone and register modes shared by the built-in translators.

use crate::model::ModeSpec;

pub const GENERAL: ModeSpec = ModeSpec {
    id: "general",
    name: "General Translation",
    prompt: "Translate the text directly and naturally for everyday use.",
    description: "General purpose translation for everyday use",
};

pub const FORMAL: ModeSpec = ModeSpec {
    id: "formal",
    name: "Formal Translation",
    prompt: r#"Use a formal register.

Focus on:
- Polite forms of address and honorifics where the target language has them
- Complete sentences and standard grammar
- Business and official vocabulary
- A respectful, professional tone"#,
    description: "Formal translation for business and official content",
};

pub const CASUAL: ModeSpec = ModeSpec {
    id: "casual",
    name: "Casual Translation",
    prompt: r#"Use a casual, conversational register.

Focus on:
- Natural everyday phrasing a native speaker would use with friends
- Common contractions and colloquial expressions
- Keeping the tone relaxed and warm"#,
    description: "Conversational translation for chats and messages",
};

pub const LITERARY: ModeSpec = ModeSpec {
    id: "literary",
    name: "Literary Translation",
    prompt: r#"Translate as a literary translator.

Focus on:
- Preserving cultural nuances
- Maintaining literary style and tone
- Poetic and artistic expression
- Character voice and narrative flow
- Emotional and aesthetic impact"#,
    description: "Artistic translation for literature and creative content",
};

pub const TECHNICAL: ModeSpec = ModeSpec {
    id: "technical",
    name: "Technical Translation",
    prompt: r#"Translate with technical precision.

Focus on:
- Technical terminology accuracy
- Industry-specific jargon
- Clear, precise language
- Software, hardware, and engineering terms
- Scientific and mathematical expressions"#,
    description: "Specialized translation for technical and scientific content",
};

pub const LEGAL: ModeSpec = ModeSpec {
    id: "legal",
    name: "Legal Translation",
    prompt: r#"Translate as a certified legal translator.

Focus on:
- Legal terminology precision
- Formal legal language structure
- Contract and statute terminology
- Preserving legal meaning and intent"#,
    description: "Professional translation for legal documents and contracts",
};

pub const IDIOMS: ModeSpec = ModeSpec {
    id: "idioms",
    name: "Idioms & Slang Translation",
    prompt: r#"Translate as a cultural linguistics expert.

Focus on:
- Idioms and their meanings
- Modern slang and internet language
- Equivalent expressions in the target language
- Providing both literal and contextual translations where an idiom has no equivalent"#,
    description: "Translation with focus on cultural expressions and idioms",
};
