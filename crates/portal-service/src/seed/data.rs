//! Departments, supervisors and students created by `portal seed`.

/// One seeded department.
pub struct DepartmentSeed {
    pub name: &'static str,
    pub description: &'static str,
    /// `(display name, email local part)`.
    pub supervisors: &'static [(&'static str, &'static str)],
    /// `(name, matric number)`.
    pub students: &'static [(&'static str, &'static str)],
}

pub const DEPARTMENTS: &[DepartmentSeed] = &[
    DepartmentSeed {
        name: "Computer Science",
        description: "Computing, software engineering and information systems",
        supervisors: &[
            ("Dr. Alan Turing", "alan.turing"),
            ("Prof. Ada Lovelace", "ada.lovelace"),
            ("Dr. Tim Berners-Lee", "tim.bernerslee"),
        ],
        students: &[
            ("Alex Johnson", "CS2024011"),
            ("Sarah Williams", "CS2024012"),
            ("Michael Brown", "CS2024013"),
            ("Emily Davis", "CS2024014"),
            ("James Wilson", "CS2024015"),
            ("Jessica Miller", "CS2024016"),
            ("David Garcia", "CS2024017"),
            ("Ashley Rodriguez", "CS2024018"),
        ],
    },
    DepartmentSeed {
        name: "Mathematics",
        description: "Pure and applied mathematics",
        supervisors: &[
            ("Prof. Isaac Newton", "isaac.newton"),
            ("Dr. Emmy Noether", "emmy.noether"),
            ("Prof. Leonhard Euler", "leonhard.euler"),
            ("Dr. Srinivasa Ramanujan", "srinivasa.ramanujan"),
        ],
        students: &[
            ("Christopher Lee", "MT2024001"),
            ("Amanda Taylor", "MT2024002"),
            ("Joshua Anderson", "MT2024003"),
            ("Stephanie Thomas", "MT2024004"),
            ("Andrew Jackson", "MT2024005"),
            ("Michelle White", "MT2024006"),
            ("Ryan Harris", "MT2024007"),
            ("Lauren Martin", "MT2024008"),
            ("Kevin Thompson", "MT2024009"),
            ("Nicole Garcia", "MT2024010"),
        ],
    },
    DepartmentSeed {
        name: "Physics",
        description: "Theoretical and experimental physics",
        supervisors: &[
            ("Prof. Albert Einstein", "albert.einstein"),
            ("Dr. Marie Curie", "marie.curie"),
            ("Prof. Richard Feynman", "richard.feynman"),
            ("Dr. Niels Bohr", "niels.bohr"),
        ],
        students: &[
            ("Brandon Martinez", "PH2024001"),
            ("Samantha Robinson", "PH2024002"),
            ("Tyler Clark", "PH2024003"),
            ("Rachel Rodriguez", "PH2024004"),
            ("Justin Lewis", "PH2024005"),
            ("Megan Lee", "PH2024006"),
            ("Nathan Walker", "PH2024007"),
            ("Brittany Hall", "PH2024008"),
            ("Zachary Allen", "PH2024009"),
        ],
    },
    DepartmentSeed {
        name: "Chemistry",
        description: "Organic, inorganic and physical chemistry",
        supervisors: &[
            ("Prof. Dmitri Mendeleev", "dmitri.mendeleev"),
            ("Dr. Linus Pauling", "linus.pauling"),
            ("Prof. Dorothy Hodgkin", "dorothy.hodgkin"),
            ("Dr. Robert Woodward", "robert.woodward"),
        ],
        students: &[
            ("Danielle Young", "CH2024001"),
            ("Jonathan Hernandez", "CH2024002"),
            ("Kayla King", "CH2024003"),
            ("Austin Wright", "CH2024004"),
            ("Courtney Lopez", "CH2024005"),
            ("Sean Hill", "CH2024006"),
            ("Alexis Scott", "CH2024007"),
            ("Jordan Green", "CH2024008"),
            ("Taylor Adams", "CH2024009"),
            ("Morgan Baker", "CH2024010"),
        ],
    },
    DepartmentSeed {
        name: "Biology",
        description: "Life sciences, genetics and ecology",
        supervisors: &[
            ("Prof. Charles Darwin", "charles.darwin"),
            ("Dr. Rosalind Franklin", "rosalind.franklin"),
            ("Prof. Gregor Mendel", "gregor.mendel"),
            ("Dr. Barbara McClintock", "barbara.mcclintock"),
        ],
        students: &[
            ("Cameron Gonzalez", "BL2024001"),
            ("Jasmine Nelson", "BL2024002"),
            ("Hunter Carter", "BL2024003"),
            ("Sierra Mitchell", "BL2024004"),
            ("Caleb Perez", "BL2024005"),
            ("Destiny Roberts", "BL2024006"),
            ("Mason Turner", "BL2024007"),
            ("Savannah Phillips", "BL2024008"),
            ("Logan Campbell", "BL2024009"),
            ("Paige Parker", "BL2024010"),
        ],
    },
];

/// Email local part for a seeded student: the lowercased name with
/// spaces replaced by dots.
pub fn student_local_part(name: &str) -> String {
    name.to_lowercase().split_whitespace().collect::<Vec<_>>().join(".")
}
