//! Student record fixtures.

use studentdir_core::model::{Internship, SemesterCourses, SocialLinks, StudentRecord};
use studentdir_core::roster::Roster;

/// Fluent builder for [`StudentRecord`] in tests.
///
/// Defaults to class of 2026, an undeclared major and empty lists.
pub struct StudentBuilder {
    record: StudentRecord,
}

impl StudentBuilder {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            record: StudentRecord {
                id: id.to_string(),
                name: name.to_string(),
                email: format!("{id}@nd.edu"),
                class_year: 2026,
                major: "Undeclared".to_string(),
                minor: None,
                courses: Vec::new(),
                hometown: String::new(),
                dorm: String::new(),
                clubs: Vec::new(),
                sports: Vec::new(),
                hobbies: Vec::new(),
                career_interests: Vec::new(),
                internships: Vec::new(),
                profile_photo_url: None,
                social: None,
            },
        }
    }

    pub fn class_year(mut self, year: u16) -> Self {
        self.record.class_year = year;
        self
    }

    pub fn major(mut self, major: &str) -> Self {
        self.record.major = major.to_string();
        self
    }

    pub fn minor(mut self, minor: &str) -> Self {
        self.record.minor = Some(minor.to_string());
        self
    }

    pub fn dorm(mut self, dorm: &str) -> Self {
        self.record.dorm = dorm.to_string();
        self
    }

    pub fn hometown(mut self, hometown: &str) -> Self {
        self.record.hometown = hometown.to_string();
        self
    }

    /// Add one semester of classes.
    pub fn semester(mut self, label: &str, classes: &[&str]) -> Self {
        self.record.courses.push(SemesterCourses {
            semester: label.to_string(),
            classes: classes.iter().map(|c| c.to_string()).collect(),
        });
        self
    }

    pub fn club(mut self, club: &str) -> Self {
        self.record.clubs.push(club.to_string());
        self
    }

    pub fn sport(mut self, sport: &str) -> Self {
        self.record.sports.push(sport.to_string());
        self
    }

    pub fn hobby(mut self, hobby: &str) -> Self {
        self.record.hobbies.push(hobby.to_string());
        self
    }

    pub fn interest(mut self, interest: &str) -> Self {
        self.record.career_interests.push(interest.to_string());
        self
    }

    pub fn internship(mut self, company: &str, role: &str) -> Self {
        self.record.internships.push(Internship {
            company: company.to_string(),
            role: role.to_string(),
        });
        self
    }

    pub fn linkedin(mut self, url: &str) -> Self {
        let social = self.record.social.get_or_insert_with(SocialLinks::default);
        social.linkedin = Some(url.to_string());
        self
    }

    pub fn build(self) -> StudentRecord {
        self.record
    }
}

/// Eight students spread across years, majors, dorms and activities.
pub fn sample_students() -> Vec<StudentRecord> {
    vec![
        StudentBuilder::new("amyz", "Amy Zephyr")
            .major("Computer Science")
            .minor("Data Science")
            .dorm("Walsh Hall")
            .hometown("South Bend, IN")
            .semester("FA25", &["Intro to Databases", "Algorithms"])
            .semester("SP26", &["Compilers"])
            .club("Chess Club")
            .club("Robotics")
            .internship("Acme Corp", "SWE Intern")
            .interest("Software Engineering")
            .build(),
        StudentBuilder::new("boby", "Bob Young")
            .class_year(2027)
            .major("Finance")
            .dorm("Keough Hall")
            .hometown("Chicago, IL")
            .semester("FA25", &["Accounting"])
            .sport("Rowing")
            .interest("Investment Banking")
            .internship("Goldman Sachs", "Summer Analyst")
            .build(),
        StudentBuilder::new("caras", "cara Smith")
            .class_year(2025)
            .major("History")
            .minor("Music")
            .dorm("Walsh Hall")
            .hometown("Austin, TX")
            .club("Chess Club")
            .hobby("Piano")
            .build(),
        StudentBuilder::new("danl", "Dan Lee")
            .class_year(2028)
            .major("Computer Science")
            .dorm("Dillon Hall")
            .hometown("Chicago, IL")
            .semester("SP26", &["Data Structures"])
            .sport("Soccer")
            .interest("Software Engineering")
            .build(),
        StudentBuilder::new("evak", "Eva Kim")
            .class_year(2027)
            .major("Biology")
            .dorm("Lewis Hall")
            .hometown("Seattle, WA")
            .club("Robotics")
            .interest("Medicine")
            .build(),
        StudentBuilder::new("frankl", "Frank Lee")
            .major("Finance")
            .minor("Data Science")
            .dorm("Dillon Hall")
            .hometown("South Bend, IN")
            .internship("Acme Corp", "Finance Intern")
            .build(),
        StudentBuilder::new("gina", "Gina")
            .class_year(2025)
            .major("Music")
            .dorm("Lewis Hall")
            .hometown("Austin, TX")
            .hobby("Piano")
            .build(),
        StudentBuilder::new("hanz", "Han Zhou")
            .class_year(2028)
            .major("Biology")
            .dorm("Keough Hall")
            .hometown("Seattle, WA")
            .sport("Rowing")
            .club("Chess Club")
            .linkedin("https://linkedin.com/in/hanz")
            .build(),
    ]
}

/// [`sample_students`] as a [`Roster`].
pub fn sample_roster() -> Roster {
    Roster::new(sample_students()).expect("sample ids are unique")
}

/// `n` students named `Student 000` .. with ids `s000` .., cycling through
/// three class years.
pub fn numbered_students(n: usize) -> Vec<StudentRecord> {
    (0..n)
        .map(|i| {
            StudentBuilder::new(&format!("s{i:03}"), &format!("Student {i:03}"))
                .class_year(2025 + (i % 3) as u16)
                .build()
        })
        .collect()
}
