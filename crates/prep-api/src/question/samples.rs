//! Built-in seed questions for an empty question bank.

use prep_db::models::{NewQuestion, QuestionOptions};

struct Sample {
    subject: &'static str,
    chapter: &'static str,
    topic: &'static str,
    difficulty: &'static str,
    question: &'static str,
    options: [&'static str; 4],
    correct: &'static str,
    explanation: &'static str,
}

const SAMPLES: &[Sample] = &[
    Sample {
        subject: "Physics",
        chapter: "Laws of Motion",
        topic: "Newton's Laws",
        difficulty: "Easy",
        question: "What is the SI unit of force?",
        options: ["Newton", "Joule", "Watt", "Pascal"],
        correct: "A",
        explanation: "Force is mass × acceleration, so its SI unit is kg⋅m/s², the newton.",
    },
    Sample {
        subject: "Physics",
        chapter: "Laws of Motion",
        topic: "Newton's Laws",
        difficulty: "Easy",
        question: "A body of mass 2 kg moves with velocity 10 m/s. What is its momentum?",
        options: ["5 kg⋅m/s", "20 kg⋅m/s", "12 kg⋅m/s", "8 kg⋅m/s"],
        correct: "B",
        explanation: "Momentum = mass × velocity = 2 × 10 = 20 kg⋅m/s.",
    },
    Sample {
        subject: "Physics",
        chapter: "Laws of Motion",
        topic: "Friction",
        difficulty: "Easy",
        question: "Which type of friction is the largest?",
        options: ["Rolling", "Sliding", "Static", "Fluid"],
        correct: "C",
        explanation: "Limiting static friction is greater than kinetic friction.",
    },
    Sample {
        subject: "Physics",
        chapter: "Work, Energy and Power",
        topic: "Power",
        difficulty: "Moderate",
        question: "Power is defined as the rate of?",
        options: ["Work done", "Energy consumed", "Force applied", "Both A and B"],
        correct: "D",
        explanation: "Power = work / time = energy / time.",
    },
    Sample {
        subject: "Physics",
        chapter: "Current Electricity",
        topic: "Ohm's Law",
        difficulty: "Easy",
        question: "Ohm's law states that V is proportional to?",
        options: ["I", "I²", "1/I", "√I"],
        correct: "A",
        explanation: "V = IR, so V is directly proportional to I.",
    },
    Sample {
        subject: "Physics",
        chapter: "Wave Optics",
        topic: "Interference",
        difficulty: "Moderate",
        question: "In Young's double slit experiment the fringe width is?",
        options: ["λD/d", "λd/D", "Dd/λ", "D/λd"],
        correct: "A",
        explanation: "β = λD/d with D the screen distance and d the slit separation.",
    },
    Sample {
        subject: "Chemistry",
        chapter: "Some Basic Concepts of Chemistry",
        topic: "Mole Concept",
        difficulty: "Easy",
        question: "What is Avogadro's number?",
        options: ["6.022 × 10²³", "6.022 × 10²⁴", "1.6 × 10⁻¹⁹", "3.0 × 10⁸"],
        correct: "A",
        explanation: "One mole contains 6.022 × 10²³ particles.",
    },
    Sample {
        subject: "Chemistry",
        chapter: "Structure of Atom",
        topic: "Quantum Numbers",
        difficulty: "Moderate",
        question: "How many orbitals are present in the n = 3 shell?",
        options: ["3", "6", "9", "12"],
        correct: "C",
        explanation: "A shell holds n² orbitals, 3² = 9.",
    },
    Sample {
        subject: "Chemistry",
        chapter: "Chemical Bonding",
        topic: "VSEPR Theory",
        difficulty: "Easy",
        question: "What is the shape of the NH₃ molecule?",
        options: ["Tetrahedral", "Pyramidal", "Planar", "Linear"],
        correct: "B",
        explanation: "The lone pair on nitrogen gives NH₃ a trigonal pyramidal shape.",
    },
    Sample {
        subject: "Chemistry",
        chapter: "Redox Reactions",
        topic: "Oxidation and Reduction",
        difficulty: "Easy",
        question: "In a redox reaction, oxidation is?",
        options: ["Gain of electrons", "Loss of electrons", "Gain of protons", "Loss of neutrons"],
        correct: "B",
        explanation: "Oxidation is loss of electrons.",
    },
    Sample {
        subject: "Biology",
        chapter: "Cell: The Unit of Life",
        topic: "Cell Organelles",
        difficulty: "Easy",
        question: "Which organelle is known as the powerhouse of the cell?",
        options: ["Nucleus", "Mitochondria", "Ribosome", "Golgi apparatus"],
        correct: "B",
        explanation: "Mitochondria are the site of aerobic respiration and ATP synthesis.",
    },
    Sample {
        subject: "Biology",
        chapter: "The Living World",
        topic: "Taxonomic Categories",
        difficulty: "Easy",
        question: "What is the basic unit of classification?",
        options: ["Genus", "Species", "Family", "Order"],
        correct: "B",
        explanation: "Species is the lowest and basic taxonomic category.",
    },
    Sample {
        subject: "Biology",
        chapter: "Molecular Basis of Inheritance",
        topic: "DNA Structure",
        difficulty: "Moderate",
        question: "In DNA, adenine pairs with?",
        options: ["Guanine", "Cytosine", "Thymine", "Uracil"],
        correct: "C",
        explanation: "Adenine pairs with thymine through two hydrogen bonds.",
    },
    Sample {
        subject: "Biology",
        chapter: "Photosynthesis in Higher Plants",
        topic: "Light Reaction",
        difficulty: "Moderate",
        question: "Oxygen released in photosynthesis comes from?",
        options: ["CO₂", "H₂O", "Glucose", "Chlorophyll"],
        correct: "B",
        explanation: "Photolysis of water releases O₂ during the light reaction.",
    },
];

/// Seed questions as insert payloads.
pub fn sample_questions() -> Vec<NewQuestion> {
    SAMPLES
        .iter()
        .map(|sample| {
            let [a, b, c, d] = sample.options.map(str::to_string);
            NewQuestion {
                subject: sample.subject.to_string(),
                chapter: sample.chapter.to_string(),
                topic: sample.topic.to_string(),
                difficulty: sample.difficulty.to_string(),
                question: sample.question.to_string(),
                options: QuestionOptions { a, b, c, d },
                correct: sample.correct.to_string(),
                explanation: sample.explanation.to_string(),
            }
        })
        .collect()
}
