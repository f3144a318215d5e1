//! The fixed instruction sent with every image.
//!
//! The model's answer is returned untouched, so this text is the only thing
//! shaping the output format. Change it deliberately and update the tests
//! below alongside it.

pub const MATH_SORT_PROMPT: &str = "Look at this image and identify all the numbers and mathematical expressions you can see. Calculate the decimal value of each expression. Sort everything from least to greatest and format your response exactly like this:\n\nSorted from least to greatest:\n1. 2/6 = 0.333\n2. π/6 = 0.524\n3. √12 ≈ 3.464\n4. 3! = 6\n5. log₂(25) ≈ 4.644\n6. Σ(i=1)^5 i = 15\n7. ∫₁¹ x dx = 17.5\n8. e^5 ≈ 148.413\n9. ∞ = infinity\n\nIMPORTANT: Use proper mathematical symbols (√, π, ², ³, ≈, ∞, Σ, ∫, etc.) and clean formatting. Do NOT use backslashes, LaTeX code, or any \\commands. Use Unicode symbols only.";
