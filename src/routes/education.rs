//! Education routes: the lesson catalog and vulnerable sample snippets used
//! by guided walkthroughs.

use axum::Json;
use serde::Serialize;

use crate::errors::ApiResponse;

#[derive(Debug, Clone, Serialize)]
pub struct Lesson {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub difficulty: &'static str,
    pub duration: &'static str,
    pub completed: bool,
}

#[derive(Debug, Serialize)]
pub struct LessonList {
    pub lessons: Vec<Lesson>,
}

#[derive(Debug, Serialize)]
pub struct SampleCode {
    pub python: &'static str,
    pub javascript: &'static str,
    pub java: &'static str,
}

/// GET /api/v1/education/lessons — the fixed lesson catalog.
pub async fn lessons() -> Json<ApiResponse<LessonList>> {
    ApiResponse::success(LessonList {
        lessons: lesson_catalog(),
    })
}

/// GET /api/v1/demo/sample-code — deliberately vulnerable snippets per language.
pub async fn sample_code() -> Json<ApiResponse<SampleCode>> {
    ApiResponse::success(SampleCode {
        python: PYTHON_SAMPLE,
        javascript: JAVASCRIPT_SAMPLE,
        java: JAVA_SAMPLE,
    })
}

fn lesson_catalog() -> Vec<Lesson> {
    vec![
        Lesson {
            id: "1",
            title: "SQL Injection Prevention",
            description: "Learn how to prevent SQL injection attacks using parameterized queries",
            difficulty: "Beginner",
            duration: "15 min",
            completed: false,
        },
        Lesson {
            id: "2",
            title: "XSS Attack Mitigation",
            description: "Understand and prevent Cross-Site Scripting vulnerabilities",
            difficulty: "Intermediate",
            duration: "20 min",
            completed: false,
        },
        Lesson {
            id: "3",
            title: "Secure Authentication Patterns",
            description: "Implement secure authentication and session management",
            difficulty: "Intermediate",
            duration: "25 min",
            completed: false,
        },
        Lesson {
            id: "4",
            title: "Cryptographic Best Practices",
            description: "Use modern encryption and hashing algorithms correctly",
            difficulty: "Advanced",
            duration: "30 min",
            completed: false,
        },
        Lesson {
            id: "5",
            title: "OWASP Top 10 Deep Dive",
            description: "Comprehensive coverage of the most critical security risks",
            difficulty: "Advanced",
            duration: "45 min",
            completed: false,
        },
    ]
}

const PYTHON_SAMPLE: &str = r#"# Vulnerable Python API Code
import sqlite3
from flask import Flask, request

app = Flask(__name__)

# VULNERABILITY: SQL Injection
@app.route('/user')
def get_user():
    user_id = request.args.get('id')
    conn = sqlite3.connect('database.db')
    cursor = conn.cursor()
    # Dangerous: String concatenation with user input
    query = "SELECT * FROM users WHERE id = " + user_id
    cursor.execute(query)
    return cursor.fetchone()

# VULNERABILITY: Hardcoded credentials
DATABASE_PASSWORD = "admin123"
API_KEY = "sk-1234567890abcdef"

# VULNERABILITY: Command Injection
@app.route('/ping')
def ping_server():
    host = request.args.get('host')
    result = os.system('ping -c 1 ' + host)
    return result

# VULNERABILITY: Weak Crypto
import hashlib
def hash_password(password):
    return hashlib.md5(password.encode()).hexdigest()
"#;

const JAVASCRIPT_SAMPLE: &str = r#"// Vulnerable JavaScript Code
const express = require('express');
const app = express();

// VULNERABILITY: XSS
app.get('/profile', (req, res) => {
    const username = req.query.name;
    // Dangerous: Unescaped user input in HTML
    res.send('<h1>Welcome ' + username + '</h1>');
});

// VULNERABILITY: Hardcoded API Key
const API_SECRET = 'sk-prod-9876543210';

// VULNERABILITY: Insecure Deserialization
app.post('/data', (req, res) => {
    const data = eval(req.body.payload);
    res.json(data);
});

// VULNERABILITY: Missing Authentication
app.get('/admin/users', (req, res) => {
    // No auth check - anyone can access
    const users = db.getAllUsers();
    res.json(users);
});
"#;

const JAVA_SAMPLE: &str = r#"// Vulnerable Java Code
import java.sql.*;
import javax.servlet.http.*;

public class UserController {
    // VULNERABILITY: SQL Injection
    public User getUser(String userId) throws SQLException {
        Connection conn = DriverManager.getConnection(DB_URL);
        Statement stmt = conn.createStatement();
        // Dangerous: Concatenated SQL query
        String query = "SELECT * FROM users WHERE id = '" + userId + "'";
        ResultSet rs = stmt.executeQuery(query);
        return parseUser(rs);
    }

    // VULNERABILITY: Hardcoded credentials
    private static final String DB_PASSWORD = "password123";
    private static final String JWT_SECRET = "supersecret";
}
"#;
