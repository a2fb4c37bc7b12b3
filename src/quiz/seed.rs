//! First-run sample data: twelve subjects and their question banks.

use sqlx::SqlitePool;
use tracing::info;

/// (text, options, index of the correct option, difficulty, explanation)
type SeedQuestion = (&'static str, [&'static str; 4], i64, &'static str, &'static str);

const SUBJECTS: &[(&str, &str, &str)] = &[
    ("Python", "🐍", "Master Python fundamentals"),
    ("JavaScript", "⚡", "Learn modern JavaScript"),
    ("Java", "☕", "Core Java concepts"),
    ("C++", "⚙️", "Object-oriented programming"),
    ("React", "⚛️", "Build modern UIs"),
    ("Node.js", "🟢", "Backend development"),
    ("SQL", "🗄️", "Database querying"),
    ("HTML/CSS", "🎨", "Web design basics"),
    ("Git", "📦", "Version control"),
    ("Docker", "🐳", "Containerization"),
    ("TypeScript", "📘", "Typed JavaScript"),
    ("MongoDB", "🍃", "NoSQL database"),
];

const PYTHON_QUESTIONS: &[SeedQuestion] = &[
    ("What is Python?", ["Compiled", "Interpreted", "OS", "DB"], 1, "Easy", "Python is interpreted"),
    ("Python file extension?", [".pt", ".pyt", ".py", ".python"], 2, "Easy", "Python files use .py"),
    ("Comment in Python?", ["//", "#", "/* */", "--"], 1, "Easy", "Use #"),
    ("Output function in Python?", ["echo()", "print()", "display()", "show()"], 1, "Easy", "Use print()"),
    ("Variable assignment?", ["x=5", "int x=5", "var x=5", "declare x=5"], 0, "Easy", "x=5 creates variable"),
    ("Invalid variable name?", ["my_var", "_myvar", "2myvar", "myVar2"], 2, "Easy", "Cannot start with number"),
    ("Output of print(10+5)?", ["105", "15", "10+5", "Error"], 1, "Easy", "Addition gives 15"),
    ("Keyword for function?", ["def", "function", "func", "define"], 0, "Easy", "def defines function"),
    ("Length of object?", ["len()", "length()", "size()", "count()"], 0, "Easy", "len() returns length"),
    ("Get input from user?", ["input()", "get()", "read()", "scan()"], 0, "Easy", "Use input()"),
];

const JAVASCRIPT_QUESTIONS: &[SeedQuestion] = &[
    ("What is JavaScript?", ["Compiled", "Scripting", "DB", "Markup"], 1, "Easy", "JS is scripting language"),
    ("Include JS in HTML?", ["<js>", "<script>", "<javascript>", "<code>"], 1, "Easy", "Use <script>"),
    ("Single-line comment in JS?", ["//", "#", "<!-- -->", "/* */"], 0, "Easy", "Use //"),
    ("Output to console?", ["log.console()", "console.log()", "print()", "console.show()"], 1, "Easy", "console.log() prints"),
    ("Declare variable in JS?", ["var", "let", "const", "All"], 3, "Easy", "Supports var, let, const"),
    ("10+\"5\" output?", ["15", "105", "Error", "undefined"], 1, "Easy", "Concatenates to \"105\""),
    ("Strict equality?", ["==", "===", "=", "equal"], 1, "Easy", "=== checks value and type"),
    ("If statement syntax?", ["if x=5", "if(x==5)", "if x==5:", "if x=5:"], 1, "Easy", "Use if(condition)"),
    ("Create function in JS?", ["function myFunc(){}", "def myFunc():", "create myFunc()", "func myFunc()"], 0, "Easy", "function name(){}"),
    ("JS typing?", ["Static", "Dynamic", "Strong", "None"], 1, "Medium", "JS is dynamically typed"),
];

const JAVA_QUESTIONS: &[SeedQuestion] = &[
    ("Java is...", ["Compiled", "Interpreted", "Both", "None"], 2, "Easy", "Both compiled and interpreted"),
    ("Entry point method?", ["main()", "start()", "init()", "run()"], 0, "Easy", "main() is entry point"),
    ("Class keyword?", ["class", "def", "function", "struct"], 0, "Easy", "class defines a class"),
    ("Java comments?", ["//", "#", "<!-- -->", "**"], 0, "Easy", "Use //"),
    ("Create object?", ["new Class()", "Class()", "object Class", "make Class"], 0, "Easy", "Use new keyword"),
    ("Package keyword?", ["package", "import", "namespace", "using"], 0, "Easy", "package declares package"),
    ("Java main args type?", ["String[]", "string", "Array", "List"], 0, "Easy", "String array"),
    ("Loop syntax?", ["for(i=0;i<n;i++)", "while(i<n)", "do{}while", "All"], 3, "Easy", "All are valid loops"),
    ("Inheritance keyword?", ["extends", "implements", "inherits", "parent"], 0, "Easy", "Use extends"),
    ("Access modifier private?", ["public", "private", "protected", "internal"], 1, "Easy", "Use private"),
];

const CPP_QUESTIONS: &[SeedQuestion] = &[
    ("C++ is...", ["Procedural", "OOP", "Both", "None"], 2, "Easy", "C++ supports both"),
    ("Include header file?", ["#include", "import", "using", "include"], 0, "Easy", "Use #include"),
    ("C++ main return type?", ["void", "int", "float", "string"], 1, "Easy", "int main() returns int"),
    ("Comment in C++?", ["//", "#", "/* */", "Both A & C"], 3, "Easy", "Both valid"),
    ("Declare variable?", ["int x=5;", "x int=5;", "var x=5;", "let x=5;"], 0, "Easy", "Use type variable"),
    ("Loop syntax?", ["for", "while", "do-while", "All"], 3, "Easy", "All are valid"),
    ("Access modifier public?", ["public", "private", "protected", "internal"], 0, "Easy", "Use public"),
    ("C++ function keyword?", ["def", "func", "return_type name()", "function"], 2, "Easy", "Return type followed by name"),
    ("Create object?", ["Class obj;", "new Class();", "object Class", "make Class"], 0, "Easy", "Class obj; creates object"),
    ("Pointer symbol?", ["*", "&", "%", "#"], 0, "Easy", "Use *"),
];

// The remaining subjects ship one representative question, repeated to a
// bank of ten like the bigger subjects.
const FILLER_QUESTIONS: &[(&str, SeedQuestion)] = &[
    ("React", ("React is...", ["Library", "Framework", "Language", "DB"], 0, "Easy", "React is a library")),
    ("Node.js", ("Node.js is...", ["Backend JS", "Frontend JS", "Database", "OS"], 0, "Easy", "Backend JS")),
    ("SQL", ("SQL is...", ["Database Language", "Programming", "Markup", "Scripting"], 0, "Easy", "SQL used for DB")),
    ("HTML/CSS", ("HTML tag for paragraph?", ["<p>", "<h1>", "<div>", "<span>"], 0, "Easy", "<p> tag used")),
    ("Git", ("Command to commit?", ["git commit", "git push", "git pull", "git add"], 0, "Easy", "git commit commits")),
    ("Docker", ("Docker container run?", ["docker run", "docker start", "docker build", "docker exec"], 0, "Easy", "docker run starts container")),
    ("TypeScript", ("TypeScript adds...?", ["Types", "UI", "DB", "Backend"], 0, "Easy", "TypeScript adds types")),
    ("MongoDB", ("MongoDB is...?", ["NoSQL DB", "SQL DB", "OS", "Library"], 0, "Easy", "MongoDB is NoSQL")),
];

fn question_bank(subject: &str) -> Vec<SeedQuestion> {
    match subject {
        "Python" => PYTHON_QUESTIONS.to_vec(),
        "JavaScript" => JAVASCRIPT_QUESTIONS.to_vec(),
        "Java" => JAVA_QUESTIONS.to_vec(),
        "C++" => CPP_QUESTIONS.to_vec(),
        _ => FILLER_QUESTIONS
            .iter()
            .find(|(name, _)| *name == subject)
            .map(|(_, question)| vec![*question; 10])
            .unwrap_or_default(),
    }
}

/// Populate subjects and questions on a fresh database. A database that
/// already has any subject is left untouched.
pub async fn seed_if_empty(db_pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let existing: Option<(i64,)> = sqlx::query_as("SELECT id FROM subjects LIMIT 1")
        .fetch_optional(db_pool)
        .await?;
    if existing.is_some() {
        return Ok(());
    }

    let mut question_count = 0;
    for (name, icon, description) in SUBJECTS {
        let subject_id = sqlx::query("INSERT INTO subjects (name, icon, description) VALUES (?, ?, ?)")
            .bind(name)
            .bind(icon)
            .bind(description)
            .execute(db_pool)
            .await?
            .last_insert_rowid();

        for (text, options, correct, difficulty, explanation) in question_bank(name) {
            sqlx::query(
                "INSERT INTO questions
                 (subject_id, question_text, option_a, option_b, option_c, option_d,
                  correct_answer, difficulty, explanation)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(subject_id)
            .bind(text)
            .bind(options[0])
            .bind(options[1])
            .bind(options[2])
            .bind(options[3])
            .bind(correct)
            .bind(difficulty)
            .bind(explanation)
            .execute(db_pool)
            .await?;
            question_count += 1;
        }
    }

    info!("seeded {} subjects and {question_count} questions", SUBJECTS.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use sqlx::sqlite::SqlitePoolOptions;
    use sqlx::SqlitePool;

    use crate::config::AppKind;
    use crate::db;

    async fn test_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        db::init_schema(AppKind::Quiz, &pool).await.unwrap();
        pool
    }

    #[tokio::test]
    async fn seeds_every_subject_with_ten_questions() {
        let pool = test_pool().await;
        super::seed_if_empty(&pool).await.unwrap();

        let (subjects,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM subjects")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(subjects, 12);

        let counts: Vec<(i64,)> =
            sqlx::query_as("SELECT COUNT(*) FROM questions GROUP BY subject_id")
                .fetch_all(&pool)
                .await
                .unwrap();
        assert_eq!(counts.len(), 12);
        assert!(counts.iter().all(|(count,)| *count == 10));
    }

    #[tokio::test]
    async fn reseeding_is_a_no_op() {
        let pool = test_pool().await;
        super::seed_if_empty(&pool).await.unwrap();
        super::seed_if_empty(&pool).await.unwrap();

        let (subjects,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM subjects")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(subjects, 12);
    }
}
