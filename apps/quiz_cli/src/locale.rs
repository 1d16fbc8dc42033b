use client_core::PerformanceBand;
use shared::domain::Language;

/// Every string the terminal front end prints, in each supported language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    Welcome,
    Starting,
    FallbackActive,
    Scenario,
    Of,
    Category,
    Difficulty,
    AnswerPrompt,
    SelectionRequired,
    UnknownOption,
    Correct,
    Incorrect,
    CorrectAnswer,
    DefaultCorrectFeedback,
    DefaultIncorrectFeedback,
    Score,
    ContinuePrompt,
    GameComplete,
    FinalScore,
    CorrectAnswers,
    Rating,
    PlayTime,
    PlayAgain,
    Goodbye,
    CannotContinue,
    Band(PerformanceBand),
}

impl Message {
    pub fn text(self, language: Language) -> &'static str {
        match language {
            Language::En => self.english(),
            Language::Es => self.spanish(),
        }
    }

    fn english(self) -> &'static str {
        match self {
            Message::Welcome => "Welcome to",
            Message::Starting => "Starting a new game...",
            Message::FallbackActive => "The game server is unavailable. Playing with offline scenarios.",
            Message::Scenario => "Scenario",
            Message::Of => "of",
            Message::Category => "Category",
            Message::Difficulty => "Difficulty",
            Message::AnswerPrompt => "Your answer (option letter, q to quit)",
            Message::SelectionRequired => "Please select an option before submitting.",
            Message::UnknownOption => "That option is not available",
            Message::Correct => "Correct!",
            Message::Incorrect => "Incorrect.",
            Message::CorrectAnswer => "Correct answer",
            Message::DefaultCorrectFeedback => "Well done!",
            Message::DefaultIncorrectFeedback => "Keep practicing!",
            Message::Score => "Score",
            Message::ContinuePrompt => "Press Enter to continue",
            Message::GameComplete => "Game complete",
            Message::FinalScore => "Final score",
            Message::CorrectAnswers => "Correct answers",
            Message::Rating => "Rating",
            Message::PlayTime => "Time played",
            Message::PlayAgain => "Play again? (y/n)",
            Message::Goodbye => "Thanks for playing!",
            Message::CannotContinue => "The game cannot continue",
            Message::Band(PerformanceBand::Excellent) => "Excellent! You are an ISO standards expert!",
            Message::Band(PerformanceBand::VeryGood) => "Very good! You have a solid understanding.",
            Message::Band(PerformanceBand::Good) => "Good job! Keep learning.",
            Message::Band(PerformanceBand::NeedsPractice) => "Keep practicing to improve your knowledge.",
        }
    }

    fn spanish(self) -> &'static str {
        match self {
            Message::Welcome => "Bienvenido a",
            Message::Starting => "Iniciando un nuevo juego...",
            Message::FallbackActive => "El servidor del juego no está disponible. Jugando con escenarios sin conexión.",
            Message::Scenario => "Escenario",
            Message::Of => "de",
            Message::Category => "Categoría",
            Message::Difficulty => "Dificultad",
            Message::AnswerPrompt => "Tu respuesta (letra de la opción, q para salir)",
            Message::SelectionRequired => "Por favor selecciona una opción antes de enviar.",
            Message::UnknownOption => "Esa opción no está disponible",
            Message::Correct => "¡Correcto!",
            Message::Incorrect => "Incorrecto.",
            Message::CorrectAnswer => "Respuesta correcta",
            Message::DefaultCorrectFeedback => "¡Bien hecho!",
            Message::DefaultIncorrectFeedback => "¡Sigue practicando!",
            Message::Score => "Puntuación",
            Message::ContinuePrompt => "Pulsa Enter para continuar",
            Message::GameComplete => "Juego completado",
            Message::FinalScore => "Puntuación final",
            Message::CorrectAnswers => "Respuestas correctas",
            Message::Rating => "Calificación",
            Message::PlayTime => "Tiempo de juego",
            Message::PlayAgain => "¿Jugar de nuevo? (s/n)",
            Message::Goodbye => "¡Gracias por jugar!",
            Message::CannotContinue => "El juego no puede continuar",
            Message::Band(PerformanceBand::Excellent) => "¡Excelente! ¡Eres un experto en normas ISO!",
            Message::Band(PerformanceBand::VeryGood) => "¡Muy bien! Tienes un conocimiento sólido.",
            Message::Band(PerformanceBand::Good) => "¡Buen trabajo! Sigue aprendiendo.",
            Message::Band(PerformanceBand::NeedsPractice) => "Sigue practicando para mejorar tus conocimientos.",
        }
    }
}

pub fn is_affirmative(answer: &str, language: Language) -> bool {
    let answer = answer.trim().to_lowercase();
    let accepted: &[&str] = match language {
        Language::En => &["y", "yes"],
        Language::Es => &["s", "si", "sí", "y", "yes"],
    };
    accepted.contains(&answer.as_str())
}
